// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Args;
use futures::stream::{self, StreamExt};
use kdam::BarExt;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use duckbox_core::an::Detections;
use duckbox_core::constant;
use duckbox_core::ds::DatasetWriter;
use duckbox_core::error::DuckboxError;
use duckbox_core::im::SceneImage;
use duckbox_core::io;
use duckbox_core::ut;

#[derive(Debug, Args)]
pub struct BuildSimArgs {
    #[arg(
        short = 'i',
        long,
        help = "Directory of simulator frames (paired render files or .npz bundles).",
        required = true
    )]
    pub input: Option<String>,

    #[arg(short = 'o', long, help = "Output dataset directory.", required = true)]
    pub output: Option<String>,

    #[arg(
        short = 's',
        long,
        help = "Side length of written square images.",
        default_value = "416"
    )]
    pub size: Option<u32>,

    #[arg(
        long,
        help = "Substring specifying camera renders (e.g. _rgb).",
        default_value = "_rgb"
    )]
    pub image_substring: Option<String>,

    #[arg(
        long,
        help = "Substring specifying segmentation renders (e.g. _seg).",
        default_value = "_seg"
    )]
    pub segment_substring: Option<String>,

    #[arg(short = 'p', long, help = "Sample name prefix.", default_value = "sim")]
    pub prefix: Option<String>,

    #[arg(short = 't', long, help = "Number of threads.")]
    pub threads: Option<usize>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

/// One simulator frame awaiting annotation
enum FrameSource {
    Bundle(PathBuf),
    Pair(PathBuf, PathBuf),
}

pub fn build_sim(args: &BuildSimArgs) {
    let size = args.size.unwrap_or(constant::DEFAULT_IMAGE_SIZE);
    let prefix = args.prefix.to_owned().unwrap_or("sim".to_string());

    let image_substring = args
        .image_substring
        .to_owned()
        .unwrap_or(constant::DEFAULT_IMAGE_SUBSTRING.to_string());

    let segment_substring = args
        .segment_substring
        .to_owned()
        .unwrap_or(constant::DEFAULT_SEGMENT_SUBSTRING.to_string());

    let threads = if let Some(t) = args.threads {
        t
    } else {
        std::thread::available_parallelism().unwrap_or_else(|_| {
            eprintln!("[duckbox::build::sim] Could not automatically assign number of tasks. Please manually set the --threads (-t) argument.");
            std::process::exit(1);
        }).get()
    };

    if size < 1 {
        eprintln!("[duckbox::build::sim] ERROR: size cannot be less than 1.");
        std::process::exit(1);
    }

    if image_substring == segment_substring {
        eprintln!(
            "[duckbox::build::sim] ERROR: Camera and segmentation renders share one directory, so different image and segment substrings must be provided."
        );
        std::process::exit(1);
    }

    let input = args.input.to_owned().unwrap();

    let bundles =
        ut::path::collect_file_paths(&input, ["npz"].as_slice(), None).unwrap_or_else(|err| {
            eprintln!("{}", err);
            std::process::exit(1);
        });

    let frames = if bundles.is_empty() {
        collect_render_pairs(&input, &image_substring, &segment_substring)
    } else {
        collect_bundles(bundles)
    };

    if frames.is_empty() {
        eprintln!(
            "[duckbox::build::sim] ERROR: No simulator frames were detected. Please check your path and/or substring identifiers."
        );
        std::process::exit(1);
    }

    ut::track::progress_log(
        &format!(
            "Detected {} simulator frames.",
            ut::track::thousands_format(frames.len())
        ),
        args.verbose,
    );

    let output = args.output.to_owned().unwrap();

    let mut writer = DatasetWriter::create(&output, &prefix).unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    let rt = tokio::runtime::Runtime::new().unwrap();

    let results = rt.block_on(run_all(frames, size, &mut writer, threads, args.verbose));

    let saved: Mutex<usize> = Mutex::new(0);
    let skipped: Mutex<usize> = Mutex::new(0);
    let failure: Mutex<Vec<String>> = Mutex::new(Vec::with_capacity(results.len()));

    results.into_par_iter().for_each(|(id, run)| match run {
        Ok(Some(_)) => *saved.lock().unwrap() += 1,
        Ok(None) => *skipped.lock().unwrap() += 1,
        Err(err) => failure.lock().unwrap().push(format!("{}\t{}", id, err)),
    });

    let saved = saved.into_inner().unwrap();
    let skipped = skipped.into_inner().unwrap();
    let failure = failure.into_inner().unwrap();

    if args.verbose {
        println!();
    }

    ut::track::progress_log(
        &format!(
            "Complete. {} samples written, {} empty frames skipped, {} failures.",
            ut::track::thousands_format(saved),
            ut::track::thousands_format(skipped),
            ut::track::thousands_format(failure.len())
        ),
        args.verbose,
    );

    if !failure.is_empty() {
        std::fs::write(
            PathBuf::from(&output).join("build_errors.tsv"),
            failure.join("\n"),
        )
        .unwrap();
    }
}

/// Collect render/segmentation file pairs matched by shared stem
fn collect_render_pairs(
    input: &str,
    image_substring: &str,
    segment_substring: &str,
) -> Vec<(String, FrameSource)> {
    let image_files = ut::path::collect_file_paths(
        input,
        constant::SUPPORTED_IMAGE_FORMATS.as_slice(),
        Some(image_substring.to_string()),
    )
    .unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    let segment_files = ut::path::collect_file_paths(
        input,
        constant::SUPPORTED_IMAGE_FORMATS.as_slice(),
        Some(segment_substring.to_string()),
    )
    .unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    let mut pairs = ut::path::collect_file_pairs(
        &image_files,
        &segment_files,
        Some(image_substring.to_string()),
        Some(segment_substring.to_string()),
    );

    pairs.sort_unstable();

    pairs
        .into_iter()
        .map(|(id, image, segment)| (id, FrameSource::Pair(image, segment)))
        .collect()
}

/// Collect .npz frame bundles in sorted order
fn collect_bundles(mut bundles: Vec<PathBuf>) -> Vec<(String, FrameSource)> {
    bundles.sort_unstable();

    bundles
        .into_iter()
        .map(|path| {
            let id = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().to_string())
                .unwrap_or_default();

            (id, FrameSource::Bundle(path))
        })
        .collect()
}

/// Annotate one simulator frame at native resolution, then rescale
fn annotate(source: FrameSource, size: u32) -> Result<(SceneImage, Detections), DuckboxError> {
    let (image, segment) = match source {
        FrameSource::Bundle(path) => io::read_frame_npz(&path)?,
        FrameSource::Pair(image_path, segment_path) => (
            SceneImage::open(&image_path)?,
            SceneImage::open(&segment_path)?,
        ),
    };

    // Boxes are extracted before any resize; resizing a segmentation render
    // would blend the exact palette colors the masks depend on.
    let mut detections = Detections::from_segments(&segment)?;

    let sx = size as f32 / segment.width() as f32;
    let sy = size as f32 / segment.height() as f32;

    let resized = image.resize(size, size)?;
    detections.scale(sx, sy);

    Ok((resized, detections))
}

/// Annotate frames concurrently and save through the writer in input order
async fn run_all(
    frames: Vec<(String, FrameSource)>,
    size: u32,
    writer: &mut DatasetWriter,
    threads: usize,
    verbose: bool,
) -> Vec<(String, Result<Option<String>, DuckboxError>)> {
    let pb = Arc::new(Mutex::new(ut::track::progress_bar(
        frames.len(),
        "Annotating",
        verbose,
    )));

    let mut annotated = stream::iter(frames)
        .map(|(id, source)| {
            let pb_clone = pb.clone();

            async move {
                let result = tokio::task::spawn_blocking(move || annotate(source, size))
                    .await
                    .unwrap_or_else(|_| {
                        Err(DuckboxError::OtherError(
                            "Failed to annotate frame.".to_string(),
                        ))
                    });

                if verbose {
                    pb_clone.lock().unwrap().update(1).unwrap();
                }

                (id, result)
            }
        })
        .buffered(threads);

    let mut results = Vec::new();

    while let Some((id, annotated_frame)) = annotated.next().await {
        let run = match annotated_frame {
            Ok((image, detections)) => {
                if detections.is_empty() {
                    Ok(None)
                } else {
                    writer.save(image, &detections).map(Some)
                }
            }
            Err(err) => Err(err),
        };

        results.push((id, run));
    }

    results
}
