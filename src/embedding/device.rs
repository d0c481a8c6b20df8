use candle_core::Device;
use tracing::warn;

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::info;

#[cfg(not(any(feature = "metal", feature = "cuda")))]
use tracing::debug;

use super::error::EmbeddingError;

/// Picks the inference device from the compiled GPU features, falling back to CPU.
pub fn select_device() -> Result<Device, EmbeddingError> {
    #[cfg(any(feature = "metal", feature = "cuda"))]
    let mut attempts: Vec<String> = Vec::new();

    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    let attempts: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                info!("Reference reranker using Metal");
                return Ok(device);
            }
            Err(e) => {
                warn!(error = %e, "Metal unavailable");
                attempts.push(format!("metal: {e}"));
            }
        }
    }

    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!("Reference reranker using CUDA");
                return Ok(device);
            }
            Err(e) => {
                warn!(error = %e, "CUDA unavailable");
                attempts.push(format!("cuda: {e}"));
            }
        }
    }

    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    {
        debug!("Built without GPU features");
    }

    if attempts.is_empty() {
        return Ok(Device::Cpu);
    }

    warn!(attempts = %attempts.join("; "), "No GPU device usable, running on CPU");
    Ok(Device::Cpu)
}
