use apex_backdrop::{
    HERO_CANVAS, STATS_CANVAS,
    camera::Projection,
    flow::{Sizing, target_size},
    landing_page,
    scenes::{
        hero::{HeroConfig, HeroMotion},
        stats::stats_pose,
    },
    viewport::Viewport,
};
use cgmath::Deg;

use crate::common::test_utils::FrameDriver;

mod common;

#[test]
fn idle_surface_never_animates() {
    let mut driver = FrameDriver::new(60);
    assert!(driver.next_frame().is_none());
    assert!(!driver.is_running());
}

#[test]
fn every_refresh_yields_exactly_one_frame() {
    let mut driver = FrameDriver::new(60);
    driver.start();
    let frames: Vec<_> = (0..120).filter_map(|_| driver.next_frame()).collect();
    assert_eq!(frames.len(), 120);
    for (n, frame) in frames.iter().enumerate() {
        assert_eq!(frame.frame, n as u64);
    }
    assert!(frames.windows(2).all(|w| w[1].elapsed > w[0].elapsed));
    assert!((frames[119].t() - 2.0).abs() < 1e-3);

    driver.stop();
    assert!(driver.next_frame().is_none());
}

#[test]
fn input_is_frozen_per_frame() {
    let mut driver = FrameDriver::new(60);
    driver.start();
    driver.input.pointer_moved(1280.0, 0.0);
    driver.input.scrolled(250.0);
    let frame = driver.next_frame().unwrap();

    driver.input.scrolled(0.0);
    assert_eq!(frame.scroll_y, 250.0);
    assert_eq!((frame.pointer.nx, frame.pointer.ny), (1.0, 1.0));
}

#[test]
fn hero_poses_replay_identically() {
    let config = HeroConfig::garage();
    let run = || {
        let mut driver = FrameDriver::new(60);
        driver.start();
        driver.input.pointer_moved(300.0, 200.0);
        let mut motion = HeroMotion::default();
        let mut poses = Vec::new();
        for n in 0..90 {
            driver.input.scrolled(n as f32 * 10.0);
            if let Some(frame) = driver.next_frame() {
                poses.push(motion.advance(&config, &frame));
            }
        }
        poses
    };
    let (a, b) = (run(), run());
    assert_eq!(a.len(), 90);
    assert_eq!(a, b);

    // the grid recedes as the page scrolls
    assert!(a.windows(2).all(|w| w[1].grid.position.z < w[0].grid.position.z));
}

#[test]
fn gears_drift_slowly() {
    let config = HeroConfig::default();
    let mut driver = FrameDriver::new(60);
    driver.start();
    let mut motion = HeroMotion::default();
    for _ in 0..600 {
        let frame = driver.next_frame().unwrap();
        motion.advance(&config, &frame);
    }
    // 600 frames at most 0.001 each
    assert!(motion.drift().iter().all(|d| d.abs() <= 0.6));
    assert!(motion.drift().iter().any(|d| d.abs() > 0.0));
}

#[test]
fn stats_grid_only_rotates() {
    let mut driver = FrameDriver::new(30);
    driver.start();
    for _ in 0..30 {
        let frame = driver.next_frame().unwrap();
        let pose = stats_pose(&frame);
        assert_eq!(pose.position, cgmath::Vector3::new(0.0, 0.0, 0.0));
    }
}

#[test]
fn resizing_twice_equals_resizing_once() {
    let mut once = Projection::new(800, 600, Deg(60.0), 0.1, 1000.0);
    let mut viewport_once = Viewport::default();
    assert!(viewport_once.resize(1920, 1080, &mut once));

    let mut twice = Projection::new(800, 600, Deg(60.0), 0.1, 1000.0);
    let mut viewport_twice = Viewport::default();
    assert!(viewport_twice.resize(1920, 1080, &mut twice));
    assert!(!viewport_twice.resize(1920, 1080, &mut twice));

    assert_eq!(once, twice);
    assert_eq!(viewport_once, viewport_twice);
    assert!((twice.aspect() - 1920.0 / 1080.0).abs() < 1e-6);
}

#[test]
fn collapsed_container_keeps_the_last_size() {
    let mut projection = Projection::new(960, 420, Deg(60.0), 0.1, 100.0);
    let mut viewport = Viewport::default();
    viewport.resize(960, 420, &mut projection);
    assert!(!viewport.resize(0, 420, &mut projection));
    assert!(!viewport.resize(960, 0, &mut projection));
    assert_eq!(viewport.size(), (960, 420));
    assert!((projection.aspect() - 960.0 / 420.0).abs() < 1e-6);
}

#[test]
fn hero_follows_the_window_and_stats_its_section() {
    let surfaces = landing_page(HeroConfig::default());
    let sizing = |id: &str| surfaces.iter().find(|s| s.canvas_id == id).map(|s| s.sizing);
    assert_eq!(sizing(HERO_CANVAS), Some(Sizing::Window));
    assert_eq!(sizing(STATS_CANVAS), Some(Sizing::Container));

    let section = Some((960, 420));
    let mut hero = Viewport::default();
    let mut hero_projection = Projection::new(1, 1, Deg(60.0), 0.1, 1000.0);
    let mut stats = Viewport::default();
    let mut stats_projection = Projection::new(1, 1, Deg(60.0), 0.1, 100.0);

    for window in [(1280, 720), (1920, 1080), (390, 844)] {
        if let Some((w, h)) = target_size(Sizing::Window, window, section) {
            hero.resize(w, h, &mut hero_projection);
        }
        if let Some((w, h)) = target_size(Sizing::Container, window, section) {
            stats.resize(w, h, &mut stats_projection);
        }
        assert_eq!(hero.size(), window);
        assert_eq!(stats.size(), (960, 420));
    }
    assert!((hero_projection.aspect() - 390.0 / 844.0).abs() < 1e-6);

    // the section collapses: the stats surface keeps its last size
    assert_eq!(target_size(Sizing::Container, (390, 844), Some((0, 0))), None);
}
