//! vr-image-service: HTTP gateway that generates VR lab images and image
//! prompts through Google's generative AI APIs.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
