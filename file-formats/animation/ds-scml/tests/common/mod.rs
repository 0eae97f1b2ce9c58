//! Node-tree fixtures shared by the integration tests
#![allow(dead_code)]

use std::path::Path;

use ds_scml::Node;

/// Tick duration at the default 30 frames per second
pub const TICK: u32 = 33;
/// Twenty ticks
pub const LENGTH: u32 = 660;

pub fn source() -> &'static Path {
    Path::new("assets/hero/hero.scml")
}

pub fn atlas_file(id: u32, name: &str, width: u32, height: u32, pivot: (f32, f32)) -> Node {
    Node::new("file")
        .with_attr("id", id)
        .with_attr("name", name)
        .with_attr("width", width)
        .with_attr("height", height)
        .with_attr("pivot_x", pivot.0)
        .with_attr("pivot_y", pivot.1)
}

pub fn folder(id: u32, name: &str, files: Vec<Node>) -> Node {
    files.into_iter().fold(
        Node::new("folder").with_attr("id", id).with_attr("name", name),
        Node::with_child,
    )
}

pub fn bone_key(id: u32, time: u32, x: f32, y: f32, angle: f32) -> Node {
    Node::new("key")
        .with_attr("id", id)
        .with_attr("time", time)
        .with_child(
            Node::new("bone")
                .with_attr("x", x)
                .with_attr("y", y)
                .with_attr("angle", angle),
        )
}

pub fn sprite_key(id: u32, time: u32, file: u32, x: f32, y: f32) -> Node {
    Node::new("key")
        .with_attr("id", id)
        .with_attr("time", time)
        .with_child(
            Node::new("object")
                .with_attr("folder", 0)
                .with_attr("file", file)
                .with_attr("x", x)
                .with_attr("y", y),
        )
}

pub fn timeline(id: u32, name: &str, bone: bool, keys: Vec<Node>) -> Node {
    let node = Node::new("timeline").with_attr("id", id).with_attr("name", name);
    let node = if bone {
        node.with_attr("object_type", "bone")
    } else {
        node
    };
    keys.into_iter().fold(node, Node::with_child)
}

pub fn bone_ref(id: i32, parent: i32, timeline: u32, key: u32) -> Node {
    Node::new("bone_ref")
        .with_attr("id", id)
        .with_attr("parent", parent)
        .with_attr("timeline", timeline)
        .with_attr("key", key)
}

pub fn object_ref(id: i32, parent: i32, timeline: u32, key: u32, z_index: i32) -> Node {
    Node::new("object_ref")
        .with_attr("id", id)
        .with_attr("parent", parent)
        .with_attr("timeline", timeline)
        .with_attr("key", key)
        .with_attr("z_index", z_index)
}

pub fn mainline_key(id: u32, time: u32, refs: Vec<Node>) -> Node {
    refs.into_iter().fold(
        Node::new("key").with_attr("id", id).with_attr("time", time),
        Node::with_child,
    )
}

pub fn animation(name: &str, length: u32, looping: bool, mainline: Vec<Node>, timelines: Vec<Node>) -> Node {
    let node = Node::new("animation")
        .with_attr("name", name)
        .with_attr("length", length)
        .with_attr("looping", looping)
        .with_child(mainline.into_iter().fold(Node::new("mainline"), Node::with_child));
    timelines.into_iter().fold(node, Node::with_child)
}

pub fn project(folders: Vec<Node>, animations: Vec<Node>) -> Node {
    let entity = animations.into_iter().fold(
        Node::new("entity").with_attr("id", 0).with_attr("name", "hero"),
        Node::with_child,
    );
    folders
        .into_iter()
        .fold(Node::new("spriter_data"), Node::with_child)
        .with_child(entity)
}

/// The `body` folder: two 40x60 frames
pub fn body_folder() -> Node {
    folder(
        0,
        "Body",
        vec![
            atlas_file(0, "body/body-0.png", 40, 60, (0.5, 0.5)),
            atlas_file(1, "body/body-1.png", 40, 60, (0.5, 0.5)),
        ],
    )
}

/// Keys every tick from 0 to `LENGTH` inclusive; the last one closes the loop
pub fn dense_bone_keys(x: f32, y: f32, degrees_per_tick: f32) -> Vec<Node> {
    (0..=LENGTH / TICK)
        .map(|i| bone_key(i, i * TICK, x, y, (i as f32 * degrees_per_tick) % 360.0))
        .collect()
}

pub fn dense_sprite_keys(file: u32, x: f32, y: f32) -> Vec<Node> {
    (0..=LENGTH / TICK)
        .map(|i| sprite_key(i, i * TICK, file, x, y))
        .collect()
}

/// Two bones (root at (100, 0), child 50 units along it) carrying one sprite
pub fn rig_animation(name: &str, degrees_per_tick: f32) -> Node {
    let last_key = LENGTH / TICK;
    animation(
        name,
        LENGTH,
        true,
        vec![
            mainline_key(
                0,
                0,
                vec![
                    bone_ref(0, -1, 0, 0),
                    bone_ref(1, 0, 1, 0),
                    object_ref(0, 1, 2, 0, 0),
                ],
            ),
            mainline_key(
                1,
                LENGTH,
                vec![
                    bone_ref(0, -1, 0, last_key),
                    bone_ref(1, 0, 1, last_key),
                    object_ref(0, 1, 2, last_key, 0),
                ],
            ),
        ],
        vec![
            timeline(0, "root", true, dense_bone_keys(100.0, 0.0, degrees_per_tick)),
            timeline(1, "spine", true, dense_bone_keys(50.0, 0.0, 0.0)),
            timeline(2, "body_0", false, dense_sprite_keys(0, 10.0, 0.0)),
        ],
    )
}
