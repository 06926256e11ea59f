// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Args;
use futures::stream::{self, StreamExt};
use kdam::BarExt;
use rayon::iter::{IntoParallelIterator, ParallelIterator};

use duckbox_core::an::{Detections, FrameObject, load_annotations};
use duckbox_core::constant;
use duckbox_core::ds::DatasetWriter;
use duckbox_core::error::DuckboxError;
use duckbox_core::im::SceneImage;
use duckbox_core::ut;

#[derive(Debug, Args)]
pub struct BuildRealArgs {
    #[arg(
        short = 'i',
        long,
        help = "Directory of annotated camera frames.",
        required = true
    )]
    pub input: Option<String>,

    #[arg(
        short = 'a',
        long,
        help = "Annotation json file mapping frame names to objects.",
        required = true
    )]
    pub annotations: Option<String>,

    #[arg(short = 'o', long, help = "Output dataset directory.", required = true)]
    pub output: Option<String>,

    #[arg(
        short = 's',
        long,
        help = "Side length of written square images.",
        default_value = "416"
    )]
    pub size: Option<u32>,

    #[arg(short = 'p', long, help = "Sample name prefix.", default_value = "real")]
    pub prefix: Option<String>,

    #[arg(short = 't', long, help = "Number of threads.")]
    pub threads: Option<usize>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn build_real(args: &BuildRealArgs) {
    let size = args.size.unwrap_or(constant::DEFAULT_IMAGE_SIZE);
    let prefix = args.prefix.to_owned().unwrap_or("real".to_string());

    let threads = if let Some(t) = args.threads {
        t
    } else {
        std::thread::available_parallelism().unwrap_or_else(|_| {
            eprintln!("[duckbox::build::real] Could not automatically assign number of tasks. Please manually set the --threads (-t) argument.");
            std::process::exit(1);
        }).get()
    };

    if size < 1 {
        eprintln!("[duckbox::build::real] ERROR: size cannot be less than 1.");
        std::process::exit(1);
    }

    let annotations_path = args.annotations.to_owned().unwrap();

    let annotations = load_annotations(&annotations_path).unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    let input = args.input.to_owned().unwrap();

    let frame_files =
        ut::path::collect_file_paths(&input, constant::IMAGE_DYNAMIC_FORMATS.as_slice(), None)
            .unwrap_or_else(|err| {
                eprintln!("{}", err);
                std::process::exit(1);
            });

    // Frames absent from the annotation document carry no objects and are
    // never written, so they are dropped before any decoding happens.
    let mut frames: Vec<(String, PathBuf, Vec<FrameObject>)> = Vec::new();

    for path in frame_files {
        let name = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => name.to_string(),
            None => continue,
        };

        if let Some(objects) = annotations.get(&name) {
            frames.push((name, path, objects.clone()));
        }
    }

    frames.sort_by(|a, b| a.0.cmp(&b.0));

    if frames.is_empty() {
        eprintln!(
            "[duckbox::build::real] ERROR: No annotated frames were detected. Please check that frame file names match the annotation json keys."
        );
        std::process::exit(1);
    }

    ut::track::progress_log(
        &format!(
            "Detected {} annotated frames.",
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

/// Convert one annotated frame into a resized image and scaled detections
///
/// Annotated objects outside the detection classes are skipped; a frame
/// whose objects are all skipped yields empty detections.
fn annotate(
    path: PathBuf,
    objects: Vec<FrameObject>,
    size: u32,
) -> Result<(SceneImage, Detections), DuckboxError> {
    let image = SceneImage::open(&path)?;

    let sx = size as f32 / image.width() as f32;
    let sy = size as f32 / image.height() as f32;

    let mut detections = Detections::new();

    for object in &objects {
        if let Some((bounding_box, class)) = object.to_detection(sx, sy) {
            detections.push(bounding_box, class);
        }
    }

    let resized = image.resize(size, size)?;

    Ok((resized, detections))
}

/// Annotate frames concurrently and save through the writer in input order
async fn run_all(
    frames: Vec<(String, PathBuf, Vec<FrameObject>)>,
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
        .map(|(id, path, objects)| {
            let pb_clone = pb.clone();

            async move {
                let result = tokio::task::spawn_blocking(move || annotate(path, objects, size))
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
