pub mod openai;

pub use openai::OpenAIChatModel;
