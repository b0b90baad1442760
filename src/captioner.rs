use anyhow::Result;
use async_trait::async_trait;
use image::DynamicImage;

use crate::config::Config;

/// A captioning model.
#[async_trait]
pub trait Captioner: Sized + Send {
    /// Load the model.
    ///
    /// Called once, before the server starts accepting traffic.
    ///
    /// # Errors
    ///
    /// Returns an error if the model cannot be loaded. The process exits
    /// without serving in that case.
    async fn setup(config: &Config) -> Result<Self>;

    /// Generate a caption for a normalized RGB image.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails.
    fn caption(&mut self, image: &DynamicImage) -> Result<String>;
}
