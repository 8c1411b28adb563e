// src/common/id_generator.rs
//! Prefixed record ids: `C_` candidates, `J_` jobs, `M_` match results,
//! followed by 8 Crockford base32 characters (no I, L, O, U).

use rand::Rng;

const CROCKFORD_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";
const ID_BODY_LENGTH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Candidate,
    Job,
    MatchResult,
}

impl RecordKind {
    pub fn prefix(self) -> &'static str {
        match self {
            RecordKind::Candidate => "C",
            RecordKind::Job => "J",
            RecordKind::MatchResult => "M",
        }
    }
}

pub fn new_record_id(kind: RecordKind) -> String {
    let mut rng = rand::thread_rng();
    let body: String = (0..ID_BODY_LENGTH)
        .map(|_| CROCKFORD_ALPHABET[rng.gen_range(0..CROCKFORD_ALPHABET.len())] as char)
        .collect();
    format!("{}_{}", kind.prefix(), body)
}

pub fn generate_candidate_id() -> String {
    new_record_id(RecordKind::Candidate)
}

pub fn generate_job_id() -> String {
    new_record_id(RecordKind::Job)
}

pub fn generate_match_id() -> String {
    new_record_id(RecordKind::MatchResult)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_prefixes_and_length() {
        for (id, prefix) in [
            (generate_candidate_id(), "C_"),
            (generate_job_id(), "J_"),
            (generate_match_id(), "M_"),
        ] {
            assert!(id.starts_with(prefix), "{} should start with {}", id, prefix);
            assert_eq!(id.len(), prefix.len() + ID_BODY_LENGTH);
        }
    }

    #[test]
    fn test_body_uses_crockford_alphabet() {
        for _ in 0..50 {
            let id = generate_job_id();
            assert!(id[2..].bytes().all(|b| CROCKFORD_ALPHABET.contains(&b)), "{}", id);
        }
    }

    #[test]
    fn test_ids_do_not_repeat() {
        let ids: HashSet<String> = (0..1000).map(|_| generate_match_id()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
