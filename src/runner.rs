use anyhow::{Context, Result};
use atomic_enum::atomic_enum;
use image::DynamicImage;
use std::{
    sync::{atomic::Ordering, Arc},
    time::Duration,
};
use tokio::sync::{mpsc, oneshot};

use crate::{captioner::Captioner, config::Config, helpers::with_timing, shutdown::Shutdown};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Model worker is not running")]
    Stopped,

    #[error("Failed to generate caption: {0}")]
    Caption(#[from] anyhow::Error),
}

#[atomic_enum]
pub enum Health {
    Starting,
    Ready,
    Busy,
    SetupFailed,
}

type ResponseSender = oneshot::Sender<Result<(String, Duration), Error>>;

pub type Extension = axum::Extension<Runner>;

/// Handle to the model task.
///
/// The model lives on a dedicated task and handles one request at a time; the
/// text decoder mutates its KV cache during generation, so calls must not
/// interleave. Concurrent requests queue at the channel.
#[derive(Clone, Debug)]
pub struct Runner {
    health: Arc<AtomicHealth>,
    sender: mpsc::Sender<(ResponseSender, DynamicImage)>,
}

impl Runner {
    /// Load the model and spawn the task that owns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the model fails to load. The caller is expected to
    /// exit rather than serve in that case.
    pub async fn new<T: Captioner + 'static>(config: &Config, shutdown: Shutdown) -> Result<Self> {
        let health = Arc::new(AtomicHealth::new(Health::Starting));

        let mut captioner = match T::setup(config).await {
            Ok(captioner) => captioner,
            Err(error) => {
                health.swap(Health::SetupFailed, Ordering::SeqCst);
                return Err(error.context("failed to load the captioning model"));
            }
        };

        health.swap(Health::Ready, Ordering::SeqCst);

        let (sender, mut rx) = mpsc::channel::<(ResponseSender, DynamicImage)>(1);

        let task_health = health.clone();
        let handle = tokio::spawn(async move {
            while let Some((tx, image)) = rx.recv().await {
                task_health.swap(Health::Busy, Ordering::SeqCst);

                tx.send(match with_timing(|| captioner.caption(&image)) {
                    (Ok(caption), predict_time) => Ok((caption, predict_time)),
                    (Err(error), _) => Err(Error::Caption(error)),
                })
                .ok();

                task_health.swap(Health::Ready, Ordering::SeqCst);
            }
        });

        tokio::spawn(async move {
            shutdown.handle().await;
            handle.abort();
        });

        Ok(Self { health, sender })
    }

    pub fn health(&self) -> Health {
        self.health.load(Ordering::SeqCst)
    }

    /// Caption an image on the model task, returning the caption and how long
    /// generation took.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails or the model task is gone.
    pub async fn run(&self, image: DynamicImage) -> Result<(String, Duration), Error> {
        let (tx, rx) = oneshot::channel();

        self.sender
            .send((tx, image))
            .await
            .map_err(|_| Error::Stopped)?;

        rx.await.map_err(|_| Error::Stopped)?
    }

    pub fn extension(&self) -> Extension {
        axum::Extension(self.clone())
    }
}
