// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::fmt;

#[derive(Debug, Clone)]
pub enum DuckboxError {
    AnnotationReadError(String),
    AnnotationParseError(String),
    BufferSizeError,
    ImageError(&'static str),
    ImageReadError,
    ImageWriteError,
    ImageFormatError,
    ImageExtensionError,
    LabelWriteError(String),
    MalformedImageError(&'static str),
    NoFileError(String),
    DirError(String),
    UnknownClassError(String),
    OtherError(String),
}

impl fmt::Display for DuckboxError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DuckboxError::AnnotationReadError(message) => {
                write!(
                    f,
                    "[duckbox::AnnotationReadError] Annotation file could not be read. {}.",
                    message
                )
            }
            DuckboxError::AnnotationParseError(message) => {
                write!(
                    f,
                    "[duckbox::AnnotationParseError] Annotation file could not be parsed. {}.",
                    message
                )
            }
            DuckboxError::BufferSizeError => {
                write!(
                    f,
                    "[duckbox::BufferSizeError] The buffer does not match provided size"
                )
            }
            DuckboxError::ImageError(message) => {
                write!(
                    f,
                    "[duckbox::ImageError] Failed to create image. {}",
                    message
                )
            }
            DuckboxError::ImageReadError => {
                write!(f, "[duckbox::ImageReadError] Failed to read image.",)
            }
            DuckboxError::ImageWriteError => {
                write!(f, "[duckbox::ImageWriteError] Failed to write image.",)
            }
            DuckboxError::ImageFormatError => {
                write!(
                    f,
                    "[duckbox::ImageFormatError] Only 1 and 3-channel u8 images are currently supported."
                )
            }
            DuckboxError::ImageExtensionError => {
                write!(
                    f,
                    "[duckbox::ImageExtensionError] Could not detect a valid image extension for input."
                )
            }
            DuckboxError::LabelWriteError(message) => {
                write!(
                    f,
                    "[duckbox::LabelWriteError] Failed to write labels to output. {}.",
                    message
                )
            }
            DuckboxError::MalformedImageError(message) => {
                write!(
                    f,
                    "[duckbox::MalformedImageError] Segmented image is malformed. {}",
                    message
                )
            }
            DuckboxError::NoFileError(message) => {
                write!(
                    f,
                    "[duckbox::NoFileError] File could not be found. {}.",
                    message
                )
            }
            DuckboxError::DirError(message) => {
                write!(
                    f,
                    "[duckbox::DirError] Directory could not be read. {}.",
                    message
                )
            }
            DuckboxError::UnknownClassError(message) => {
                write!(
                    f,
                    "[duckbox::UnknownClassError] Class '{}' is not present in the class color table.",
                    message
                )
            }
            DuckboxError::OtherError(message) => {
                write!(f, "[duckbox::OtherError] Error: {}.", message)
            }
        }
    }
}

impl std::error::Error for DuckboxError {}
