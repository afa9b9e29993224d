//! # Circuit Artifacts
//!
//! Loads the three artifacts published for a circuit name and caches the
//! decoded bundle for the lifetime of the owning [`ArtifactCache`].
//!
//! ## Addressing
//!
//! | Artifact           | Path (relative to the store root)          |
//! |--------------------|--------------------------------------------|
//! | Circuit definition | `circuits/{name}.circuit.json`             |
//! | Proving key        | `circuits/keys/{name}.proving.key`         |
//! | Verification key   | `circuits/keys/{name}.verification.key`    |
//!
//! Keys are arkworks compressed canonical encodings of
//! `ark_groth16::{ProvingKey, VerifyingKey}<Bn254>`. The circuit definition
//! is a [`CircuitManifest`]: it names one of the circuit families compiled
//! into this crate and the parameters it was built with. Loading checks the
//! manifest against the built-in circuit and the keys against the manifest.
//!
//! ## Caching
//!
//! The cache is populate-once, read-many. Each circuit name owns a
//! `tokio::sync::OnceCell`, so concurrent first requests share one fetch
//! (single-flight) and later requests never touch the store. A failed load
//! leaves the cell empty: the next request fetches again. The map lock is a
//! `parking_lot::Mutex` and is never held across an `.await`.

mod directory;
mod error;
mod http;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use ark_bn254::{Bn254, Fr};
use ark_groth16::{Groth16, PreparedVerifyingKey, ProvingKey, VerifyingKey};
use ark_relations::r1cs::{ConstraintSynthesizer, ConstraintSystem, OptimizationGoal, SynthesisMode};
use ark_serialize::CanonicalDeserialize;
use ark_snark::SNARK;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use zkq_crypto::PoseidonParameters;

use crate::circuits::{AnswerCircuit, ANSWER_CIRCUIT_KIND, ANSWER_PUBLIC_INPUTS};

pub use directory::DirectorySource;
pub use error::ArtifactError;
pub use http::HttpSource;

/// Curve tag accepted in manifests.
pub const MANIFEST_CURVE: &str = "bn254";
/// Proving-system tag accepted in manifests.
pub const MANIFEST_PROVING_SYSTEM: &str = "groth16";
/// Commitment tag accepted in manifests.
pub const MANIFEST_COMMITMENT: &str = "poseidon-circom";

/// One of the three artifacts published per circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// The circuit manifest.
    Circuit,
    /// Groth16 proving key.
    ProvingKey,
    /// Groth16 verification key.
    VerificationKey,
}

impl ArtifactKind {
    /// Every kind, in fetch order.
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Circuit,
        ArtifactKind::ProvingKey,
        ArtifactKind::VerificationKey,
    ];
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ArtifactKind::Circuit => "circuit definition",
            ArtifactKind::ProvingKey => "proving key",
            ArtifactKind::VerificationKey => "verification key",
        };
        f.write_str(label)
    }
}

/// Reject names that could escape the store layout.
pub fn validate_circuit_name(circuit: &str) -> Result<(), ArtifactError> {
    let valid = !circuit.is_empty()
        && circuit
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(ArtifactError::InvalidCircuitName(circuit.to_string()))
    }
}

/// Store-relative path of an artifact.
pub fn artifact_path(circuit: &str, kind: ArtifactKind) -> Result<String, ArtifactError> {
    validate_circuit_name(circuit)?;
    Ok(match kind {
        ArtifactKind::Circuit => format!("circuits/{circuit}.circuit.json"),
        ArtifactKind::ProvingKey => format!("circuits/keys/{circuit}.proving.key"),
        ArtifactKind::VerificationKey => format!("circuits/keys/{circuit}.verification.key"),
    })
}

/// A store that serves artifact bytes.
#[async_trait]
pub trait ArtifactSource: Send + Sync + fmt::Debug {
    /// Fetch one artifact. Implementations must not cache.
    async fn fetch(&self, circuit: &str, kind: ArtifactKind) -> Result<Vec<u8>, ArtifactError>;
}

/// Circuit definition published next to the keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitManifest {
    /// Circuit name; must match the name it was fetched under.
    pub name: String,
    /// Circuit family compiled into this crate.
    pub kind: String,
    /// Pairing curve.
    pub curve: String,
    /// Proving system.
    pub proving_system: String,
    /// Commitment function evaluated in-circuit.
    pub commitment: String,
    /// Number of public inputs.
    pub public_inputs: usize,
}

impl CircuitManifest {
    /// Manifest describing the answer circuit under `name`.
    pub fn answer_verifier(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: ANSWER_CIRCUIT_KIND.to_string(),
            curve: MANIFEST_CURVE.to_string(),
            proving_system: MANIFEST_PROVING_SYSTEM.to_string(),
            commitment: MANIFEST_COMMITMENT.to_string(),
            public_inputs: ANSWER_PUBLIC_INPUTS,
        }
    }

    fn check_supported(&self, circuit: &str) -> Result<(), ArtifactError> {
        let unsupported = |reason: String| ArtifactError::Unsupported {
            circuit: circuit.to_string(),
            reason,
        };
        if self.name != circuit {
            return Err(unsupported(format!("manifest is for circuit {:?}", self.name)));
        }
        if self.kind != ANSWER_CIRCUIT_KIND {
            return Err(unsupported(format!("unknown circuit kind {:?}", self.kind)));
        }
        if self.curve != MANIFEST_CURVE {
            return Err(unsupported(format!("unsupported curve {:?}", self.curve)));
        }
        if self.proving_system != MANIFEST_PROVING_SYSTEM {
            return Err(unsupported(format!(
                "unsupported proving system {:?}",
                self.proving_system
            )));
        }
        if self.commitment != MANIFEST_COMMITMENT {
            return Err(unsupported(format!(
                "unsupported commitment {:?}",
                self.commitment
            )));
        }
        if self.public_inputs != ANSWER_PUBLIC_INPUTS {
            return Err(unsupported(format!(
                "expected {ANSWER_PUBLIC_INPUTS} public inputs, manifest declares {}",
                self.public_inputs
            )));
        }
        Ok(())
    }
}

/// A circuit with its decoded keys, ready for proving and verification.
pub struct LoadedCircuit {
    manifest: CircuitManifest,
    params: Arc<PoseidonParameters<Fr>>,
    proving_key: ProvingKey<Bn254>,
    prepared_vk: PreparedVerifyingKey<Bn254>,
}

impl LoadedCircuit {
    /// Check the manifest and decode both keys.
    pub fn compile(
        circuit: &str,
        manifest_bytes: &[u8],
        proving_key_bytes: &[u8],
        verification_key_bytes: &[u8],
    ) -> Result<Self, ArtifactError> {
        let manifest: CircuitManifest =
            serde_json::from_slice(manifest_bytes).map_err(|e| ArtifactError::MalformedManifest {
                circuit: circuit.to_string(),
                reason: e.to_string(),
            })?;
        manifest.check_supported(circuit)?;

        let malformed = |kind: ArtifactKind, reason: String| ArtifactError::MalformedKey {
            circuit: circuit.to_string(),
            kind,
            reason,
        };

        let proving_key = ProvingKey::<Bn254>::deserialize_compressed(proving_key_bytes)
            .map_err(|e| malformed(ArtifactKind::ProvingKey, e.to_string()))?;
        let verifying_key = VerifyingKey::<Bn254>::deserialize_compressed(verification_key_bytes)
            .map_err(|e| malformed(ArtifactKind::VerificationKey, e.to_string()))?;

        if verifying_key.gamma_abc_g1.len() != manifest.public_inputs + 1 {
            return Err(malformed(
                ArtifactKind::VerificationKey,
                format!(
                    "key accepts {} public inputs, circuit has {}",
                    verifying_key.gamma_abc_g1.len().saturating_sub(1),
                    manifest.public_inputs
                ),
            ));
        }
        if proving_key.vk != verifying_key {
            return Err(malformed(
                ArtifactKind::VerificationKey,
                "verification key does not belong to the proving key".to_string(),
            ));
        }

        let params = Arc::new(zkq_crypto::circom_parameters()?);
        let variables = setup_variable_count(circuit, AnswerCircuit::blank(params.clone()))?;
        if proving_key.a_query.len() != variables {
            return Err(malformed(
                ArtifactKind::ProvingKey,
                format!(
                    "key covers {} variables, the {} circuit allocates {variables}",
                    proving_key.a_query.len(),
                    manifest.kind
                ),
            ));
        }

        let prepared_vk = Groth16::<Bn254>::process_vk(&verifying_key)
            .map_err(|e| malformed(ArtifactKind::VerificationKey, e.to_string()))?;

        Ok(Self {
            manifest,
            params,
            proving_key,
            prepared_vk,
        })
    }

    /// The circuit name.
    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    /// The validated manifest.
    pub fn manifest(&self) -> &CircuitManifest {
        &self.manifest
    }

    /// Decoded proving key.
    pub fn proving_key(&self) -> &ProvingKey<Bn254> {
        &self.proving_key
    }

    /// Decoded verification key.
    pub fn verifying_key(&self) -> &VerifyingKey<Bn254> {
        &self.proving_key.vk
    }

    /// Verification key with precomputed pairings.
    pub fn prepared_verifying_key(&self) -> &PreparedVerifyingKey<Bn254> {
        &self.prepared_vk
    }

    /// Circuit instance with a full assignment.
    pub fn answer_circuit(&self, secret: Fr, identity: Fr, expected_commitment: Fr) -> AnswerCircuit {
        AnswerCircuit::new(self.params.clone(), secret, identity, expected_commitment)
    }

    /// Circuit instance without assignments.
    pub fn blank_circuit(&self) -> AnswerCircuit {
        AnswerCircuit::blank(self.params.clone())
    }
}

/// Number of R1CS variables (instance and witness) the key generator sees
/// when it synthesizes `blank`.
fn setup_variable_count(circuit: &str, blank: AnswerCircuit) -> Result<usize, ArtifactError> {
    let cs = ConstraintSystem::<Fr>::new_ref();
    cs.set_optimization_goal(OptimizationGoal::Constraints);
    cs.set_mode(SynthesisMode::Setup);
    blank
        .generate_constraints(cs.clone())
        .map_err(|e| ArtifactError::Unsupported {
            circuit: circuit.to_string(),
            reason: format!("built-in circuit failed to synthesize: {e}"),
        })?;
    cs.finalize();
    Ok(cs.num_instance_variables() + cs.num_witness_variables())
}

impl fmt::Debug for LoadedCircuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedCircuit")
            .field("manifest", &self.manifest)
            .field("constraints_a_query", &self.proving_key.a_query.len())
            .finish()
    }
}

type CacheCell = Arc<OnceCell<Arc<LoadedCircuit>>>;

/// Load-once cache of circuit bundles, keyed by circuit name.
pub struct ArtifactCache {
    source: Arc<dyn ArtifactSource>,
    entries: Mutex<HashMap<String, CacheCell>>,
}

impl ArtifactCache {
    /// Create an empty cache backed by `source`.
    pub fn new(source: Arc<dyn ArtifactSource>) -> Self {
        Self {
            source,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Return the bundle for `circuit`, fetching it on first use.
    pub async fn load(&self, circuit: &str) -> Result<Arc<LoadedCircuit>, ArtifactError> {
        validate_circuit_name(circuit)?;

        let cell = {
            let mut entries = self.entries.lock();
            entries.entry(circuit.to_string()).or_default().clone()
        };

        if let Some(loaded) = cell.get() {
            tracing::debug!(circuit, "artifact cache hit");
            return Ok(loaded.clone());
        }

        let loaded = cell
            .get_or_try_init(|| self.fetch_and_compile(circuit))
            .await?;
        Ok(loaded.clone())
    }

    /// Whether a bundle for `circuit` is already cached.
    pub fn is_cached(&self, circuit: &str) -> bool {
        self.entries
            .lock()
            .get(circuit)
            .is_some_and(|cell| cell.initialized())
    }

    async fn fetch_and_compile(&self, circuit: &str) -> Result<Arc<LoadedCircuit>, ArtifactError> {
        tracing::info!(circuit, source = ?self.source, "artifact cache miss, fetching");

        let (manifest, proving_key, verification_key) = tokio::try_join!(
            self.source.fetch(circuit, ArtifactKind::Circuit),
            self.source.fetch(circuit, ArtifactKind::ProvingKey),
            self.source.fetch(circuit, ArtifactKind::VerificationKey),
        )?;

        let loaded = LoadedCircuit::compile(circuit, &manifest, &proving_key, &verification_key)
            .map_err(|e| {
                tracing::warn!(circuit, error = %e, "circuit artifacts rejected");
                e
            })?;

        tracing::info!(
            circuit,
            proving_key_bytes = proving_key.len(),
            verification_key_bytes = verification_key.len(),
            "circuit artifacts loaded"
        );
        Ok(Arc::new(loaded))
    }
}

impl fmt::Debug for ArtifactCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactCache")
            .field("source", &self.source)
            .field("entries", &self.entries.lock().len())
            .finish()
    }
}
