// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;

use duckbox_core::im::SceneImage;
use duckbox_core::io::write_frame_npz;

const DUCKIE: [u8; 3] = [0xcf, 0xa9, 0x23];
const CONE: [u8; 3] = [0xff, 0xa6, 0x00];

fn paint(data: &mut [u8], width: u32, x0: u32, y0: u32, w: u32, h: u32, color: [u8; 3]) {
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            let idx = ((y * width + x) * 3) as usize;
            data[idx..idx + 3].copy_from_slice(&color);
        }
    }
}

fn render_image(width: u32, height: u32) -> SceneImage {
    let data: Vec<u8> = (0..width * height * 3).map(|i| (i % 251) as u8).collect();
    SceneImage::new(width, height, 3, data).unwrap()
}

fn segment_with_objects(width: u32, height: u32) -> SceneImage {
    let mut data = vec![0u8; (width * height * 3) as usize];
    paint(&mut data, width, 5, 5, 10, 8, DUCKIE);
    paint(&mut data, width, 50, 50, 4, 4, CONE);
    SceneImage::new(width, height, 3, data).unwrap()
}

fn segment_empty(width: u32, height: u32) -> SceneImage {
    let data = vec![0u8; (width * height * 3) as usize];
    SceneImage::new(width, height, 3, data).unwrap()
}

fn write_sim_pairs(input: &Path) {
    std::fs::create_dir_all(input).unwrap();

    for (stem, segment) in [
        ("frame_1", segment_with_objects(64, 64)),
        ("frame_2", segment_empty(64, 64)),
        ("frame_3", segment_with_objects(64, 64)),
    ] {
        render_image(64, 64)
            .save(input.join(format!("{}_rgb.png", stem)))
            .unwrap();

        segment
            .save(input.join(format!("{}_seg.png", stem)))
            .unwrap();
    }
}

#[test]
fn test_build_sim_pairs_and_split() {
    const INPUT: &str = "TEST_CLI_SIM_INPUT";
    const OUTPUT: &str = "TEST_CLI_SIM_OUTPUT";

    write_sim_pairs(Path::new(INPUT));

    Command::cargo_bin("duckbox")
        .unwrap()
        .args(["build", "sim", "-i", INPUT, "-o", OUTPUT, "--size", "64"])
        .assert()
        .success();

    // Two frames carry objects; the empty frame_2 is skipped
    let output = Path::new(OUTPUT);
    assert!(output.join("images/sim_0.jpg").exists());
    assert!(output.join("images/sim_1.jpg").exists());
    assert!(!output.join("images/sim_2.jpg").exists());

    let labels = std::fs::read_to_string(output.join("labels/sim_0.txt")).unwrap();
    assert_eq!(labels, "0 5 5 15 13\n1 50 50 54 54\n");

    Command::cargo_bin("duckbox")
        .unwrap()
        .args(["split", "-d", OUTPUT, "-f", "0.5", "-s", "7"])
        .assert()
        .success();

    let train = std::fs::read_to_string(output.join("train.txt")).unwrap();
    let val = std::fs::read_to_string(output.join("val.txt")).unwrap();

    assert_eq!(train.lines().count(), 1);
    assert_eq!(val.lines().count(), 1);
    assert_ne!(train, val);

    std::fs::remove_dir_all(INPUT).unwrap();
    std::fs::remove_dir_all(OUTPUT).unwrap();
}

#[test]
fn test_build_sim_resumes_numbering() {
    const INPUT: &str = "TEST_CLI_SIM_RESUME_INPUT";
    const OUTPUT: &str = "TEST_CLI_SIM_RESUME_OUTPUT";

    write_sim_pairs(Path::new(INPUT));

    for _ in 0..2 {
        Command::cargo_bin("duckbox")
            .unwrap()
            .args(["build", "sim", "-i", INPUT, "-o", OUTPUT, "--size", "64"])
            .assert()
            .success();
    }

    let output = Path::new(OUTPUT);
    assert!(output.join("images/sim_0.jpg").exists());
    assert!(output.join("images/sim_3.jpg").exists());
    assert!(!output.join("images/sim_4.jpg").exists());

    std::fs::remove_dir_all(INPUT).unwrap();
    std::fs::remove_dir_all(OUTPUT).unwrap();
}

#[test]
fn test_build_sim_npz_bundles() {
    const INPUT: &str = "TEST_CLI_SIM_NPZ_INPUT";
    const OUTPUT: &str = "TEST_CLI_SIM_NPZ_OUTPUT";

    std::fs::create_dir_all(INPUT).unwrap();

    for stem in ["frame_1", "frame_2"] {
        write_frame_npz(
            Path::new(INPUT).join(format!("{}.npz", stem)),
            &render_image(64, 64),
            &segment_with_objects(64, 64),
        )
        .unwrap();
    }

    Command::cargo_bin("duckbox")
        .unwrap()
        .args(["build", "sim", "-i", INPUT, "-o", OUTPUT, "--size", "64"])
        .assert()
        .success();

    let output = Path::new(OUTPUT);
    assert!(output.join("images/sim_0.jpg").exists());
    assert!(output.join("images/sim_1.jpg").exists());

    let labels = std::fs::read_to_string(output.join("labels/sim_1.txt")).unwrap();
    assert_eq!(labels, "0 5 5 15 13\n1 50 50 54 54\n");

    std::fs::remove_dir_all(INPUT).unwrap();
    std::fs::remove_dir_all(OUTPUT).unwrap();
}

#[test]
fn test_build_sim_scales_boxes() {
    const INPUT: &str = "TEST_CLI_SIM_SCALE_INPUT";
    const OUTPUT: &str = "TEST_CLI_SIM_SCALE_OUTPUT";

    std::fs::create_dir_all(INPUT).unwrap();

    render_image(64, 64)
        .save(Path::new(INPUT).join("frame_1_rgb.png"))
        .unwrap();

    segment_with_objects(64, 64)
        .save(Path::new(INPUT).join("frame_1_seg.png"))
        .unwrap();

    Command::cargo_bin("duckbox")
        .unwrap()
        .args(["build", "sim", "-i", INPUT, "-o", OUTPUT, "--size", "128"])
        .assert()
        .success();

    // Boxes double with the 64 -> 128 resize
    let labels = std::fs::read_to_string(Path::new(OUTPUT).join("labels/sim_0.txt")).unwrap();
    assert_eq!(labels, "0 10 10 30 26\n1 100 100 108 108\n");

    std::fs::remove_dir_all(INPUT).unwrap();
    std::fs::remove_dir_all(OUTPUT).unwrap();
}

#[test]
fn test_build_real_from_annotations() {
    const INPUT: &str = "TEST_CLI_REAL_INPUT";
    const OUTPUT: &str = "TEST_CLI_REAL_OUTPUT";
    const ANNOTATIONS: &str = "TEST_CLI_REAL_ANNS.json";

    std::fs::create_dir_all(INPUT).unwrap();

    for name in ["frame_000001.jpg", "frame_000002.jpg", "unlisted.jpg"] {
        render_image(64, 64).save(Path::new(INPUT).join(name)).unwrap();
    }

    let annotations = r#"{
        "frame_000001.jpg": [
            { "cat_name": "duckie", "bbox": [5.0, 5.0, 10.0, 8.0] },
            { "cat_name": "house", "bbox": [0.0, 0.0, 20.0, 20.0] }
        ],
        "frame_000002.jpg": [
            { "cat_name": "house", "bbox": [0.0, 0.0, 20.0, 20.0] }
        ]
    }"#;

    std::fs::write(ANNOTATIONS, annotations).unwrap();

    Command::cargo_bin("duckbox")
        .unwrap()
        .args([
            "build",
            "real",
            "-i",
            INPUT,
            "-a",
            ANNOTATIONS,
            "-o",
            OUTPUT,
            "--size",
            "64",
        ])
        .assert()
        .success();

    // frame_000002 only holds a non-detection class and unlisted.jpg has no
    // annotations, so a single sample is written
    let output = Path::new(OUTPUT);
    assert!(output.join("images/real_0.jpg").exists());
    assert!(!output.join("images/real_1.jpg").exists());

    let labels = std::fs::read_to_string(output.join("labels/real_0.txt")).unwrap();
    assert_eq!(labels, "0 5 5 15 13\n");

    std::fs::remove_dir_all(INPUT).unwrap();
    std::fs::remove_dir_all(OUTPUT).unwrap();
    std::fs::remove_file(ANNOTATIONS).unwrap();
}

#[test]
fn test_build_sim_missing_input() {
    Command::cargo_bin("duckbox")
        .unwrap()
        .args([
            "build",
            "sim",
            "-i",
            "TEST_CLI_DOES_NOT_EXIST",
            "-o",
            "TEST_CLI_UNUSED_OUTPUT",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duckbox"));
}

#[test]
fn test_split_missing_dataset() {
    Command::cargo_bin("duckbox")
        .unwrap()
        .args(["split", "-d", "TEST_CLI_DOES_NOT_EXIST"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("duckbox"));
}

#[test]
fn test_build_requires_subcommand() {
    Command::cargo_bin("duckbox")
        .unwrap()
        .arg("build")
        .assert()
        .failure();
}
