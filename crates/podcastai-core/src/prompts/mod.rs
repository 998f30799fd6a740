//! Prompt templates for the generative model.

mod dialogue;

pub use dialogue::{dialogue_user_prompt, DIALOGUE_SYSTEM, DIALOGUE_USER_TEMPLATE};
