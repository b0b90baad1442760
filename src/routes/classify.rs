use axum::{extract::rejection::JsonRejection, routing::post, Extension, Json, Router};
use serde::{Deserialize, Serialize};

use crate::{attributes, errors::HTTPError, imaging, runner::Extension as ExtractRunner};

pub fn handler() -> Router {
    Router::new().route("/classify", post(classify))
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct Classification {
    color: Option<&'static str>,
    #[serde(rename = "type")]
    clothing: Option<&'static str>,
    caption: String,
}

async fn classify(
    Extension(runner): ExtractRunner,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Result<Json<Classification>, HTTPError> {
    let Json(request) = payload.map_err(reject)?;
    let image_data = request
        .image
        .ok_or_else(|| HTTPError::new("No image data provided"))?;

    let image = imaging::decode(&image_data)?;

    let (caption, predict_time) = runner.run(image).await.map_err(|error| {
        tracing::error!("Caption generation failed: {error}");
        HTTPError::from(error)
    })?;
    tracing::debug!("Generated caption in {predict_time:?}: {caption:?}");

    let attributes = attributes::extract(&caption);
    Ok(Json(Classification {
        color: attributes.color,
        clothing: attributes.clothing,
        caption,
    }))
}

fn reject(rejection: JsonRejection) -> HTTPError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            HTTPError::new("Content-Type must be application/json")
        }
        // Unparseable or mistyped bodies stay client errors; anything else
        // (e.g. an over-long body) keeps the rejection's own status.
        JsonRejection::JsonSyntaxError(_) | JsonRejection::JsonDataError(_) => {
            HTTPError::new(rejection.body_text())
        }
        rejection => HTTPError::new(rejection.body_text()).with_status(rejection.status()),
    }
}
