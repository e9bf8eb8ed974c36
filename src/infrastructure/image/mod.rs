mod openai_image_client;

pub use openai_image_client::OpenAiImageClient;
