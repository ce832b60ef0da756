pub mod detecting_extractor;
pub mod onnx_arcface_embedder;
