use serde::{Deserialize, Serialize};

pub mod get_api_health {
    use super::*;

    /// Body of the clinic API's root endpoint
    #[derive(Deserialize, Serialize, Debug)]
    pub struct APIResponse {
        pub message: String,
    }
}
