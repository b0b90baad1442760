use anyhow::{anyhow, Result};
use async_trait::async_trait;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::{generation::LogitsProcessor, models::blip};
use hf_hub::{api::sync::ApiBuilder, Repo, RepoType};
use image::DynamicImage;
use tokenizers::Tokenizer;

use crate::{captioner::Captioner, config::Config};

/// Hub repository the weights and tokenizer are fetched from.
const MODEL_ID: &str = "Salesforce/blip-image-captioning-base";

/// BERT-style vocabulary markers used by the text decoder.
const BOS_TOKEN_ID: u32 = 30522;
const SEP_TOKEN_ID: u32 = 102;

/// Input resolution of the vision tower.
const IMAGE_SIZE: usize = 384;

/// Normalization constants applied by the upstream image processor.
const IMAGE_MEAN: [f32; 3] = [0.48145466, 0.4578275, 0.40821073];
const IMAGE_STD: [f32; 3] = [0.26862954, 0.261_302_6, 0.275_777_1];

/// BLIP conditional-generation model, greedy-decoded.
///
/// Greedy decoding keeps captions deterministic for identical input images.
pub struct BlipCaptioner {
    model: blip::BlipForConditionalGeneration,
    tokenizer: Tokenizer,
    logits_processor: LogitsProcessor,
    device: Device,
    max_tokens: usize,
}

#[async_trait]
impl Captioner for BlipCaptioner {
    async fn setup(config: &Config) -> Result<Self> {
        let cache_dir = config.model_cache_dir.clone();
        let max_tokens = config.max_caption_tokens;

        // The hub client and safetensors loading are blocking.
        tokio::task::spawn_blocking(move || {
            let mut api = ApiBuilder::new().with_progress(false);
            if let Some(cache_dir) = cache_dir {
                api = api.with_cache_dir(cache_dir);
            }
            let repo = api
                .build()?
                .repo(Repo::new(MODEL_ID.to_string(), RepoType::Model));

            tracing::info!("Fetching {MODEL_ID} from the Hugging Face Hub");
            let tokenizer = Tokenizer::from_file(repo.get("tokenizer.json")?)
                .map_err(|error| anyhow!("failed to load tokenizer: {error}"))?;
            let weights = repo.get("model.safetensors")?;

            let device = Device::cuda_if_available(0)?;
            let vb =
                unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, &device)? };
            let model = blip::BlipForConditionalGeneration::new(
                &blip::Config::image_captioning_base(),
                vb,
            )?;
            tracing::info!("Model loading complete");

            Ok(Self {
                model,
                tokenizer,
                logits_processor: LogitsProcessor::new(0, None, None),
                device,
                max_tokens,
            })
        })
        .await?
    }

    fn caption(&mut self, image: &DynamicImage) -> Result<String> {
        let image_embeds = self
            .preprocess(image)?
            .unsqueeze(0)?
            .apply(self.model.vision_model())?;

        self.model.reset_kv_cache();
        let mut token_ids = vec![BOS_TOKEN_ID];
        for index in 0..self.max_tokens {
            let context_size = if index > 0 { 1 } else { token_ids.len() };
            let start_pos = token_ids.len().saturating_sub(context_size);
            let input_ids = Tensor::new(&token_ids[start_pos..], &self.device)?.unsqueeze(0)?;

            let logits = self.model.text_decoder().forward(&input_ids, &image_embeds)?;
            let logits = logits.squeeze(0)?;
            let logits = logits.get(logits.dim(0)? - 1)?;

            let token = self.logits_processor.sample(&logits)?;
            if token == SEP_TOKEN_ID {
                break;
            }
            token_ids.push(token);
        }

        self.tokenizer
            .decode(&token_ids[1..], true)
            .map_err(|error| anyhow!("failed to decode generated tokens: {error}"))
    }
}

impl BlipCaptioner {
    /// Resize to the vision tower's resolution and normalize to the
    /// processor's mean/std, yielding a `(3, 384, 384)` tensor.
    fn preprocess(&self, image: &DynamicImage) -> Result<Tensor> {
        let image = image.resize_to_fill(
            IMAGE_SIZE as u32,
            IMAGE_SIZE as u32,
            image::imageops::FilterType::Triangle,
        );
        let data = image.to_rgb8().into_raw();

        let data = Tensor::from_vec(data, (IMAGE_SIZE, IMAGE_SIZE, 3), &self.device)?
            .permute((2, 0, 1))?;
        let mean = Tensor::new(&IMAGE_MEAN, &self.device)?.reshape((3, 1, 1))?;
        let std = Tensor::new(&IMAGE_STD, &self.device)?.reshape((3, 1, 1))?;

        Ok((data.to_dtype(DType::F32)? / 255.)?
            .broadcast_sub(&mean)?
            .broadcast_div(&std)?)
    }
}
