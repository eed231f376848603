use crate::engines::generation::genome::Genome;
use crate::error::{CodonSoupError, SyncError};
use serde::{Deserialize, Serialize};

pub const ANONYMOUS_CLIENT: &str = "anonymous";

/// A genome submission as it crosses the pool boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenomePayload {
    pub genome: Vec<f64>,
    pub fitness: f64,
    #[serde(default)]
    pub client_id: String,
}

impl GenomePayload {
    pub fn new(genome: &Genome, fitness: f64, client_id: impl Into<String>) -> Self {
        Self {
            genome: genome.codons().to_vec(),
            fitness,
            client_id: client_id.into(),
        }
    }
}

/// A payload that passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidSubmission {
    pub genome: Genome,
    pub fitness: f64,
    pub client_id: String,
}

pub struct SubmissionValidator;

impl SubmissionValidator {
    /// Check a payload before it may touch the pool. Any failure is a
    /// `SyncError::Rejected`; nothing is partially applied.
    pub fn validate(payload: &GenomePayload) -> Result<ValidSubmission, SyncError> {
        let genome = Genome::new(payload.genome.clone()).map_err(|e| match e {
            CodonSoupError::Validation(reason) => SyncError::Rejected(reason),
            other => SyncError::Rejected(other.to_string()),
        })?;

        if !payload.fitness.is_finite() {
            return Err(SyncError::Rejected(format!(
                "fitness must be finite, got {}",
                payload.fitness
            )));
        }

        let client_id = match payload.client_id.trim() {
            "" => ANONYMOUS_CLIENT.to_string(),
            id => id.to_string(),
        };

        Ok(ValidSubmission {
            genome,
            fitness: payload.fitness,
            client_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(genome: Vec<f64>, fitness: f64) -> GenomePayload {
        GenomePayload {
            genome,
            fitness,
            client_id: String::new(),
        }
    }

    #[test]
    fn test_accepts_valid_payload_and_defaults_client() {
        let valid = SubmissionValidator::validate(&payload(vec![0.5; 50], 3.0)).unwrap();
        assert_eq!(valid.client_id, ANONYMOUS_CLIENT);
        assert_eq!(valid.genome.len(), 50);
    }

    #[test]
    fn test_rejects_bad_lengths() {
        assert!(SubmissionValidator::validate(&payload(vec![0.5; 49], 1.0)).is_err());
        assert!(SubmissionValidator::validate(&payload(vec![0.5; 201], 1.0)).is_err());
        assert!(SubmissionValidator::validate(&payload(vec![0.5; 200], 1.0)).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_codons_and_fitness() {
        let mut codons = vec![0.5; 60];
        codons[7] = 1.5;
        let err = SubmissionValidator::validate(&payload(codons, 1.0)).unwrap_err();
        assert!(matches!(err, SyncError::Rejected(_)));

        let mut codons = vec![0.5; 60];
        codons[3] = f64::NAN;
        assert!(SubmissionValidator::validate(&payload(codons, 1.0)).is_err());

        assert!(SubmissionValidator::validate(&payload(vec![0.5; 60], f64::INFINITY)).is_err());
    }

    #[test]
    fn test_rejection_reason_matches_genome_checks() {
        let mut codons = vec![0.5; 60];
        codons[2] = -0.1;
        let expected = match Genome::new(codons.clone()) {
            Err(CodonSoupError::Validation(reason)) => reason,
            other => panic!("expected validation error, got {:?}", other),
        };
        match SubmissionValidator::validate(&payload(codons, 1.0)) {
            Err(SyncError::Rejected(reason)) => assert_eq!(reason, expected),
            other => panic!("expected rejection, got {:?}", other),
        }
    }
}
