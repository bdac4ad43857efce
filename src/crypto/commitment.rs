//! Keccak-256 commitments over verification data
//!
//! The batcher builds its batch merkle tree over leaf hashes derived from
//! these commitments. Two encoding rules matter and are easy to get wrong:
//! - `proof`, `pub_input` and `verification_key` are committed to through
//!   their lowercase hex rendering (no `0x` prefix), not their raw bytes;
//! - `vm_program_code` is committed to over its raw bytes.
//!
//! Absent optional fields commit to 32 zero bytes, which is distinct from
//! the hash of an empty input.

use alloy::primitives::keccak256;

use crate::domain::{VerificationData, VerificationDataCommitment};

/// 32-byte Keccak-256 digest
pub type Hash256 = [u8; 32];

/// Sentinel commitment for absent optional fields
pub const EMPTY_COMMITMENT: Hash256 = [0u8; 32];

/// Hash the lowercase hex rendering of `data`, without a `0x` prefix.
#[inline]
fn keccak_hex(data: &[u8]) -> Hash256 {
    keccak256(hex::encode(data).as_bytes()).0
}

/// Compute the commitments for one submission.
///
/// ```text
/// proof_commitment                  = KECCAK256(HEX(proof))
/// pub_input_commitment              = KECCAK256(HEX(pub_input))        if present, else 0x00 * 32
/// proving_system_aux_data_commitment:
///     KECCAK256(vm_program_code)                                       if present (raw bytes)
///     KECCAK256(HEX(verification_key))                                 else if present
///     0x00 * 32                                                        otherwise
/// ```
pub fn commit_verification_data(data: &VerificationData) -> VerificationDataCommitment {
    let proof_commitment = keccak_hex(&data.proof);

    let pub_input_commitment = data
        .pub_input
        .as_deref()
        .map(keccak_hex)
        .unwrap_or(EMPTY_COMMITMENT);

    // vm_program_code takes priority over the verification key, and is the
    // one field hashed over raw bytes rather than hex.
    let proving_system_aux_data_commitment = match (&data.vm_program_code, &data.verification_key) {
        (Some(code), _) => keccak256(code).0,
        (None, Some(vk)) => keccak_hex(vk),
        (None, None) => EMPTY_COMMITMENT,
    };

    VerificationDataCommitment {
        proof_commitment,
        pub_input_commitment,
        proving_system_aux_data_commitment,
        proof_generator_addr: data.proof_generator_addr.into_array(),
    }
}

/// Compute the merkle leaf hash for a commitment.
///
/// ```text
/// leaf_preimage =
///   proof_commitment(32) ||
///   pub_input_commitment(32) ||
///   proving_system_aux_data_commitment(32) ||
///   proof_generator_addr(20)
///
/// leaf_hash = KECCAK256(leaf_preimage)
/// ```
///
/// Single digest over the 116-byte concatenation, no length prefixes.
pub fn commitment_leaf_hash(commitment: &VerificationDataCommitment) -> Hash256 {
    let mut preimage = [0u8; 116];
    preimage[..32].copy_from_slice(&commitment.proof_commitment);
    preimage[32..64].copy_from_slice(&commitment.pub_input_commitment);
    preimage[64..96].copy_from_slice(&commitment.proving_system_aux_data_commitment);
    preimage[96..].copy_from_slice(&commitment.proof_generator_addr);
    keccak256(preimage).0
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use alloy::primitives::Address;

    use crate::domain::ProvingSystem;

    use super::*;

    fn hash_from_hex(s: &str) -> Hash256 {
        hex::decode(s).unwrap().try_into().unwrap()
    }

    fn groth16_item() -> VerificationData {
        VerificationData {
            proving_system: ProvingSystem::Groth16Bn254,
            proof: vec![1, 2, 3],
            pub_input: Some(vec![4]),
            verification_key: Some(vec![5]),
            vm_program_code: None,
            proof_generator_addr: Address::from_str(
                "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
            )
            .unwrap(),
        }
    }

    #[test]
    fn test_proof_commitment_hashes_hex_encoding() {
        let commitment = commit_verification_data(&groth16_item());

        // keccak256 of the ASCII string "010203", not of the raw bytes
        assert_eq!(
            commitment.proof_commitment,
            hash_from_hex("8bd72a5c683b47d6fb6d759d0742b14b510a609f195d324e033ffea28cc47670")
        );
        assert_eq!(
            commitment.pub_input_commitment,
            hash_from_hex("2863888acbf9d0dd8a9bf6ee524c027cd0d6ac11d11b171c062c7fdcab955b9e")
        );
        assert_eq!(
            commitment.proving_system_aux_data_commitment,
            hash_from_hex("c0808950cb90e5c2356fdddf1e63b4dd8e9b8b5c5e45d8f820c44becf2f76122")
        );
    }

    #[test]
    fn test_leaf_hash_golden_vector() {
        let commitment = commit_verification_data(&groth16_item());
        assert_eq!(
            commitment_leaf_hash(&commitment),
            hash_from_hex("45da8c059483e55cd49e1ba8961c3db6a7a139f635d4b5dda3b5167a456866c7")
        );
    }

    #[test]
    fn test_absent_optionals_commit_to_zeroes() {
        let mut data = groth16_item();
        data.pub_input = None;
        data.verification_key = None;

        let commitment = commit_verification_data(&data);
        assert_eq!(commitment.pub_input_commitment, EMPTY_COMMITMENT);
        assert_eq!(commitment.proving_system_aux_data_commitment, EMPTY_COMMITMENT);
    }

    #[test]
    fn test_empty_input_differs_from_absent() {
        let keccak_of_empty =
            hash_from_hex("c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470");

        let mut data = groth16_item();
        data.pub_input = Some(vec![]);
        let present_but_empty = commit_verification_data(&data);
        assert_eq!(present_but_empty.pub_input_commitment, keccak_of_empty);

        data.pub_input = None;
        let absent = commit_verification_data(&data);
        assert_eq!(absent.pub_input_commitment, EMPTY_COMMITMENT);
        assert_ne!(absent.pub_input_commitment, keccak_of_empty);
    }

    #[test]
    fn test_vm_program_code_hashed_raw_and_wins_over_key() {
        let mut data = groth16_item();
        data.vm_program_code = Some(vec![7, 7, 7]);

        let commitment = commit_verification_data(&data);
        assert_eq!(
            commitment.proving_system_aux_data_commitment,
            hash_from_hex("ea0eeccf8a6db02f98e455688f45fc57c59a18e0a73d90195a5859b257504e6c")
        );
        // and not the hash of the hex string "070707"
        assert_ne!(
            commitment.proving_system_aux_data_commitment,
            hash_from_hex("1882e31bde552825fdeb20fc3af86c423aecd5bfcd9ebb7832d51817e7bbb5c1")
        );
    }

    #[test]
    fn test_distinct_proofs_produce_distinct_commitments() {
        let a = commit_verification_data(&groth16_item());

        let mut other = groth16_item();
        other.proof = vec![1, 2, 4];
        let b = commit_verification_data(&other);

        assert_ne!(a.proof_commitment, b.proof_commitment);
        assert_ne!(commitment_leaf_hash(&a), commitment_leaf_hash(&b));
    }
}
