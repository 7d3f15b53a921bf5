use async_trait::async_trait;
use crate::core::TransformedImage;
use crate::utils::TransformError;

/// A remote call that restyles one image.
///
/// Implementations are stateless between calls and safe to share across
/// concurrently running transformations.
#[async_trait]
pub trait ImageTransformer: Send + Sync {
    /// Transforms `image` (of type `mime_type`) into a studio-style image.
    async fn transform(&self, image: &[u8], mime_type: &str) -> Result<TransformedImage, TransformError>;
}
