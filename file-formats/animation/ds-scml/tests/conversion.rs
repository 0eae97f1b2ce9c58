//! Whole-project conversion tests

mod common;

use std::fs;
use std::path::PathBuf;

use common::*;
use ds_scml::{ConvertConfig, Error, Node, convert_file, convert_node};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn arm_folder() -> Node {
    folder(
        1,
        "Arm",
        vec![
            atlas_file(0, "arm/arm-0.png", 16, 32, (0.0, 1.0)),
            atlas_file(1, "arm/arm-1 duration'0'.png", 16, 32, (0.0, 1.0)),
            atlas_file(2, "arm/(missing).png", 16, 32, (0.0, 0.0)),
            atlas_file(3, "arm/arm-3.png", 16, 32, (0.5, 0.5)),
        ],
    )
}

#[test]
fn test_build_descriptor() {
    let root = project(vec![body_folder(), arm_folder()], vec![]);
    let conversion = convert_node(&root, source(), &ConvertConfig::default()).unwrap();

    let build = &conversion.build;
    assert_eq!(build.kind, "Build");
    assert_eq!(build.version, 6);
    assert_eq!(build.name, "hero");
    assert_eq!(build.scale, 1.0);

    let names: Vec<&str> = build.symbols.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["body", "arm"]);

    let arm = build.symbol("arm").unwrap();
    let records: Vec<(u32, u32)> = arm.frames.iter().map(|f| (f.index, f.duration)).collect();
    assert_eq!(records, vec![(0, 2), (3, 1)]);

    // pivot at the bottom-left corner puts the image centre up and right
    let first = &arm.frames[0];
    assert_eq!((first.x, first.y), (8.0, 16.0));
    assert_eq!((first.width, first.height), (16, 32));
    assert_eq!(build.frame("arm", 1).map(|f| f.index), Some(0));
}

#[test]
fn test_image_mapping() {
    let root = project(vec![body_folder(), arm_folder()], vec![]);
    let conversion = convert_node(&root, source(), &ConvertConfig::default()).unwrap();

    let base = PathBuf::from("assets/hero");
    let expected = vec![
        ("arm-0".to_string(), base.join("arm/arm-0.png")),
        ("arm-3".to_string(), base.join("arm/arm-3.png")),
        ("body-0".to_string(), base.join("body/body-0.png")),
        ("body-1".to_string(), base.join("body/body-1.png")),
    ];
    assert_eq!(conversion.images.into_iter().collect::<Vec<_>>(), expected);
}

#[test]
fn test_anim_descriptor_and_stats() {
    let root = project(
        vec![body_folder()],
        vec![
            rig_animation("idle", 0.0),
            rig_animation("walk", 18.0),
            animation("empty", LENGTH, true, vec![], vec![]),
        ],
    );
    let config = ConvertConfig {
        anim_version: 5,
        ..ConvertConfig::default()
    };
    let conversion = convert_node(&root, source(), &config).unwrap();

    assert_eq!(conversion.anim.kind, "Anim");
    assert_eq!(conversion.anim.version, 5);
    let names: Vec<&str> = conversion.anim.banks["hero"]
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(names, vec!["idle", "walk"]);

    assert_eq!(conversion.stats.symbols, 1);
    assert_eq!(conversion.stats.animations, 2);
    assert_eq!(conversion.stats.frames, 40);
    assert_eq!(conversion.stats.skipped_placements, 0);
}

#[test]
fn test_entity_without_animations_gets_empty_bank() {
    let root = project(vec![body_folder()], vec![]);
    let conversion = convert_node(&root, source(), &ConvertConfig::default()).unwrap();

    assert!(conversion.anim.banks["hero"].is_empty());
    assert_eq!(conversion.stats.animations, 0);
}

#[test]
fn test_frame_rate_changes_tick_count() {
    let root = project(vec![body_folder()], vec![rig_animation("idle", 0.0)]);
    let config = ConvertConfig {
        frame_rate: 15,
        ..ConvertConfig::default()
    };
    let conversion = convert_node(&root, source(), &config).unwrap();

    let bank = &conversion.anim.banks["hero"]["idle"];
    assert_eq!(bank.frame_rate, 15);
    // 66 ms ticks over 660 ms
    assert_eq!(bank.frame_count, 10);
    assert_eq!(bank.frames.len(), 10);
}

#[test]
fn test_invalid_config_rejected() {
    let root = project(vec![body_folder()], vec![rig_animation("idle", 0.0)]);
    let config = ConvertConfig {
        frame_rate: 0,
        ..ConvertConfig::default()
    };

    assert!(matches!(
        convert_node(&root, source(), &config),
        Err(Error::InvalidConfig(_))
    ));
}

#[test]
fn test_malformed_attribute_rejected() {
    let root = project(
        vec![folder(
            0,
            "Body",
            vec![Node::new("file")
                .with_attr("id", 0)
                .with_attr("name", "body/body-0.png")
                .with_attr("width", "wide")
                .with_attr("height", 60)],
        )],
        vec![],
    );

    assert!(matches!(
        convert_node(&root, source(), &ConvertConfig::default()),
        Err(Error::MalformedAttribute { .. })
    ));
}

#[test]
fn test_descriptor_json_layout() {
    let root = project(vec![body_folder()], vec![rig_animation("idle", 0.0)]);
    let conversion = convert_node(&root, source(), &ConvertConfig::default()).unwrap();

    let anim = serde_json::to_value(&conversion.anim).unwrap();
    let bank = &anim["banks"]["hero"]["idle"];
    assert_eq!(bank["framerate"], 30);
    assert_eq!(bank["numframes"], 20);

    let frame = &bank["frames"][0];
    assert_eq!(frame["w"], 44.0);
    assert_eq!(frame["h"], 66.0);
    let element = &frame["elements"][0];
    assert_eq!(element["name"], "body");
    assert_eq!(element["layername"], "body");
    assert_eq!(element["z_index"], 1);
    assert!(element["m_tx"].is_number());

    let build = serde_json::to_value(&conversion.build).unwrap();
    assert_eq!(build["type"], "Build");
    assert_eq!(build["Symbol"]["body"][1]["framenum"], 1);
}

#[test]
fn test_convert_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hero.json");
    let root = project(vec![body_folder()], vec![rig_animation("idle", 9.0)]);
    fs::write(&path, serde_json::to_string_pretty(&root).unwrap()).unwrap();

    let conversion = convert_file(&path, &ConvertConfig::default()).unwrap();

    assert_eq!(conversion.build.name, "hero");
    assert_eq!(
        conversion.images["body-0"],
        dir.path().join("body/body-0.png")
    );
    assert_eq!(conversion.anim.banks["hero"]["idle"].frames.len(), 20);
}

#[test]
fn test_convert_file_reports_bad_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ \"tag\": ").unwrap();

    assert!(matches!(
        convert_file(&path, &ConvertConfig::default()),
        Err(Error::Json(_))
    ));
    assert!(matches!(
        convert_file(&dir.path().join("absent.json"), &ConvertConfig::default()),
        Err(Error::Io(_))
    ));
}
