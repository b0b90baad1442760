#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

use captiond::model::BlipCaptioner;

captiond::serve!(BlipCaptioner);
