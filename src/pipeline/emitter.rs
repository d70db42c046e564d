//! Runs code generation and posts the resulting message.

use crate::codegen::Codegen;
use crate::error::{EchoprintError, Result};
use crate::pipeline::message::EchoprintMessage;
use crate::pipeline::types::FingerprintResult;
use crossbeam_channel::Sender;
use std::sync::Arc;

/// Wraps the code generator and the outbound message channel.
pub struct FingerprintEmitter {
    codegen: Arc<dyn Codegen>,
    message_tx: Sender<EchoprintMessage>,
}

impl FingerprintEmitter {
    pub fn new(codegen: Arc<dyn Codegen>, message_tx: Sender<EchoprintMessage>) -> Self {
        Self {
            codegen,
            message_tx,
        }
    }

    /// Computes a code over the first `count` samples of `samples`.
    ///
    /// `count` larger than the buffer is a caller bug and fails rather than
    /// fingerprinting fewer samples.
    pub fn compute(&self, samples: &[f32], count: usize) -> Result<FingerprintResult> {
        let prefix = samples
            .get(..count)
            .ok_or_else(|| EchoprintError::Fingerprint {
                message: format!(
                    "asked for {} samples but only {} are buffered",
                    count,
                    samples.len()
                ),
            })?;
        let code = self.codegen.generate(prefix)?;
        Ok(FingerprintResult::new(code, count))
    }

    /// Posts exactly one message carrying the code.
    ///
    /// A bus nobody listens to is not an error.
    pub fn notify(&self, result: FingerprintResult) -> bool {
        self.message_tx
            .send(EchoprintMessage::new(result.code))
            .is_ok()
    }

    /// Name of the wrapped generator.
    pub fn codegen_name(&self) -> &str {
        self.codegen.name()
    }
}
