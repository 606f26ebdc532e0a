//! Request payload builders for the metadata-generation probes.
//!
//! Both generate-meta endpoints accept the same chat-style payload: one
//! user message pairing a text instruction with an inlined sample image,
//! plus a function-call schema describing the metadata fields the service
//! should return. The sample image is a constant so that every diagnostic
//! run exercises the same request shape.

use serde_json::{json, Value};

/// Token budget sent with every generate-meta request.
pub const GENERATE_META_MAX_TOKENS: u32 = 500;

/// Name of the function the service is asked to call.
pub const METADATA_FUNCTION_NAME: &str = "generate_image_metadata";

/// Constant 24x24 PNG sample, inlined as a data URI.
pub const SAMPLE_IMAGE_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAABgAAAAYCAYAAADgdz34AAAABHNCSVQICAgIfAhkiAAAAAlwSFlzAAAApgAAAKYB3X3/OAAAABl0RVh0U29mdHdhcmUAd3d3Lmlua3NjYXBlLm9yZ5vuPBoAAANCSURBVEiJtZZPbBtFFMZ/M7ubXdtdb1xSFyeilBapySVU8h8OoFaooFSqiihIVIpQBKci6KEg9Q6H9kovIHoCIVQJJCKE1ENFjnAgcaSGC6rEnxBwA04Tx43t2FnvDAfjkNibxgHxnWb2e/u992bee7tCa00YFsffekFY+nUzFtjW0LrvjRXrCDIAaPLlW0nHL0SsZtVoaF98mLrx3pdhOqLtYPHChahZcYYO7KvPFxvRl5XPp1sN3adWiD1ZAqD6XYK1b/dvE5IWryTt2udLFedwc1+9kLp+vbbpoDh+6TklxBeAi9TL0taeWpdmZzQDry0AcO+jQ12RyohqqoYoo8RDwJrU+qXkjWtfi8Xxt58BdQuwQs9qC/afLwCw8tnQbqYAPsgxE1S6F3EAIXux2oQFKm0ihMsOF71dHYx+f3NND68ghCu1YIoePPQN1pGRABkJ6Bus96CutRZMydTl+TvuiRW1m3n0eDl0vRPcEysqdXn+jsQPsrHMquGeXEaY4Yk4wxWcY5V/9scqOMOVUFthatyTy8QyqwZ+kDURKoMWxNKr2EeqVKcTNOajqKoBgOE28U4tdQl5p5bwCw7BWquaZSzAPlwjlithJtp3pTImSqQRrb2Z8PHGigD4RZuNX6JYj6wj7O4TFLbCO/Mn/m8R+h6rYSUb3ekokRY6f/YukArN979jcW+V/S8g0eT/N3VN3kTqWbQ428m9/8k0P/1aIhF36PccEl6EhOcAUCrXKZXXWS3XKd2vc/TRBG9O5ELC17MmWubD2nKhUKZa26Ba2+D3P+4/MNCFwg59oWVeYhkzgN/JDR8deKBoD7Y+ljEjGZ0sosXVTvbc6RHirr2reNy1OXd6pJsQ+gqjk8VWFYmHrwBzW/n+uMPFiRwHB2I7ih8ciHFxIkd/3Omk5tCDV1t+2nNu5sxxpDFNx+huNhVT3/zMDz8usXC3ddaHBj1GHj/As08fwTS7Kt1HBTmyN29vdwAw+/wbwLVOJ3uAD1wi/dUH7Qei66PfyuRj4Ik9is+hglfbkbfR3cnZm7chlUWLdwmprtCohX4HUtlOcQjLYCu+fzGJH2QRKvP3UNz8bWk1qMxjGTOMThZ3kvgLI5AzFfo379UAAAAASUVORK5CYII=";

/// Builds the `messages` array: one user message with the text instruction
/// and the inlined sample image.
pub fn image_messages() -> Value {
    json!([
        {
            "role": "user",
            "content": [
                {
                    "type": "text",
                    "text": "Generate metadata for this image.",
                },
                {
                    "type": "image_url",
                    "image_url": { "url": SAMPLE_IMAGE_DATA_URI },
                },
            ],
        },
    ])
}

/// Builds the function-call schema the service fills in.
///
/// `alt_text` and `title` are required, `caption` is optional; all three
/// are plain strings.
pub fn metadata_function_definition() -> Value {
    json!({
        "name": METADATA_FUNCTION_NAME,
        "description": "Generates structured metadata for an image, including alt text, title, and caption.",
        "parameters": {
            "type": "object",
            "properties": {
                "alt_text": { "type": "string", "description": "Detailed alt text for accessibility." },
                "title": { "type": "string", "description": "A concise title for the image." },
                "caption": { "type": "string", "description": "An informative caption." },
            },
            "required": ["alt_text", "title"],
        },
    })
}
