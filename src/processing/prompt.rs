/// Fixed styling instruction sent with every image. Not user-controlled.
pub const STUDIO_PROMPT: &str = "\
Transform this product photo into a high-quality, studio-style image.
- Background: The background should be a clean, neutral, and unobtrusive light gray gradient (#f0f0f0 to #e0e0e0), completely replacing the original background.
- Lighting: Apply soft, balanced, diffuse studio lighting to eliminate harsh shadows and highlight the product's details naturally.
- Color & Realism: Perform subtle color correction to make the product's colors vibrant and accurate. Preserve the product's original shape, texture, and all details faithfully.
- Final Look: The output should be a photorealistic, professional image suitable for a modern e-commerce catalog. Do not add any text or watermarks.
";
