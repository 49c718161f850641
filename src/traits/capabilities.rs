//! ModelCapabilities structure

use serde::{Deserialize, Serialize};

/// What a model can accept. Wrappers report their inner model's flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCapabilities {
    pub supports_tools: bool,
    pub supports_structured_output: bool,
    pub supports_image_input: bool,
}

impl ModelCapabilities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tools(mut self) -> Self {
        self.supports_tools = true;
        self
    }
    pub fn with_structured_output(mut self) -> Self {
        self.supports_structured_output = true;
        self
    }
    pub fn with_image_input(mut self) -> Self {
        self.supports_image_input = true;
        self
    }
}
