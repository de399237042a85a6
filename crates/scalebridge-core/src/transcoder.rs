// # Transcoder
//
// Entry points used by the resource lifecycle layer: `encode` after a
// domain object is fetched from the management API, `decode` before one
// is sent.
//
// ## Usage
//
// ```rust,ignore
// use scalebridge_core::Transcoder;
//
// let transcoder = Transcoder::with_defaults();
//
// let state: NamespaceEntity = transcoder.encode(&namespace)?;
// let request: Namespace = transcoder.decode(&plan)?;
// ```

use std::sync::Arc;

use crate::config::TranscodeConfig;
use crate::error::Result;
use crate::forward::Encoder;
use crate::registry::BindingRegistry;
use crate::reverse::Decoder;
use crate::traits::{Domain, Model};
use crate::value::{Attributes, Value};

/// Owns a binding registry and a conversion policy
///
/// Cheap to clone; clones share the registry.
#[derive(Debug, Clone)]
pub struct Transcoder {
    registry: Arc<BindingRegistry>,
    config: TranscodeConfig,
}

impl Transcoder {
    /// Create a transcoder over an injected registry
    pub fn new(registry: Arc<BindingRegistry>, config: TranscodeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    /// Transcoder over the process-wide registry with default policy
    pub fn with_defaults() -> Self {
        Self {
            registry: BindingRegistry::shared(),
            config: TranscodeConfig::default(),
        }
    }

    pub fn registry(&self) -> &Arc<BindingRegistry> {
        &self.registry
    }

    pub fn config(&self) -> &TranscodeConfig {
        &self.config
    }

    pub fn encoder(&self) -> Encoder<'_> {
        Encoder::new(&self.registry, &self.config)
    }

    pub fn decoder(&self) -> Decoder<'_> {
        Decoder::new(&self.registry, &self.config)
    }

    /// Domain struct → fresh tri-state model
    pub fn encode<D: Domain, M: Model>(&self, source: &D) -> Result<M> {
        self.encoder().encode(source)
    }

    /// Domain struct → Object value of its natural type
    pub fn encode_value<D: Domain>(&self, source: &D) -> Result<Value> {
        self.encoder().encode_value(source)
    }

    /// Tri-state model → fresh domain struct
    pub fn decode<M: Model, D: Domain>(&self, source: &M) -> Result<D> {
        self.decoder().decode(source)
    }

    /// Object value → fresh domain struct
    pub fn decode_value<D: Domain>(&self, value: &Value) -> Result<D> {
        self.decoder().decode_value(value)
    }

    /// Attribute map → fresh domain struct
    pub fn decode_attributes<D: Domain>(&self, attributes: &Attributes) -> Result<D> {
        self.decoder().decode_attributes(attributes)
    }
}

impl Default for Transcoder {
    fn default() -> Self {
        Self::with_defaults()
    }
}
