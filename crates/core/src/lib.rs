pub mod shared {
    pub mod constants;
    pub mod frame;
    pub mod model_resolver;
    pub mod onnx_session;
}

pub mod detection {
    pub mod domain {
        pub mod face_box;
        pub mod face_detector;
    }
    pub mod infrastructure;
}

pub mod embedding {
    pub mod domain {
        pub mod embedding_extractor;
        pub mod face_embedder;
        pub mod face_embedding;
    }
    pub mod infrastructure;
}

pub mod library {
    pub mod domain {
        pub mod frame_decoder;
        pub mod photo_filter;
        pub mod photo_placer;
        pub mod photo_scanner;
    }
    pub mod infrastructure;
}

pub mod registry {
    pub mod domain {
        pub mod registry;
        pub mod registry_store;
    }
    pub mod infrastructure;
}

pub mod matching {
    pub mod domain {
        pub mod identity_matcher;
        pub mod sort_report;
    }
}

pub mod pipeline {
    pub mod face_sorter;
    pub mod photo_fault;
    pub mod pipeline_logger;
    pub mod register_faces_use_case;
    pub mod sort_photos_use_case;
}

#[cfg(any(test, feature = "testing"))]
pub mod testing;
