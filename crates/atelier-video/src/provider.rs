pub(crate) mod huggingface;
