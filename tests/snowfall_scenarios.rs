//! End-to-end scenarios driven through the headless renderer.
//!
//! These run the full frame loop (wind update, uniform write, draw) and
//! check what the kernel produced for every particle.

use snowfall::kernel;
use snowfall::prelude::*;
use snowfall::ParticleBuffers;

use rand::rngs::SmallRng;
use rand::SeedableRng;

fn viewport(width: u32, height: u32) -> Viewport {
    Viewport::new(width, height, 1.0)
}

fn animation(count: u32, vp: Viewport) -> SnowAnimation<HeadlessRenderer> {
    SnowAnimation::with_seed(SnowConfig::default(), vp, HeadlessRenderer::new(vp), count, 2024).unwrap()
}

// ============================================================================
// Frame loop
// ============================================================================

#[test]
fn test_hundred_particles_stay_in_volume() {
    let mut snow = animation(100, viewport(800, 600));
    assert_eq!(snow.field().len(), 100);

    for frame in 1..=600 {
        snow.tick_at(frame as f32 / 60.0).unwrap();

        let drawn = snow.renderer().last_frame();
        assert_eq!(drawn.len(), 100);
        for p in drawn {
            // y wraps; x wraps before the orbit wobble is added, z only wobbles.
            assert!((-6.0..6.0).contains(&p.world.y), "y {}", p.world.y);
            assert!(p.world.x.abs() <= 6.0 + 10.0, "x {}", p.world.x);
            assert!(p.world.z.abs() <= 6.0 + 10.0, "z {}", p.world.z);
            assert!(p.world.is_finite());
        }
    }
    assert_eq!(snow.renderer().frames_rendered(), 600);
}

#[test]
fn test_fall_after_one_second() {
    let mut snow = animation(100, viewport(800, 600));
    snow.tick_at(1.0).unwrap();

    for (p, attrs) in snow.renderer().last_frame().iter().zip(snow.field().iter()) {
        let expected = kernel::glsl_mod(attrs.position.y - 1.0 * attrs.speed.y * 25.0, 12.0) - 6.0;
        assert_eq!(p.world.y, expected);
    }
}

#[test]
fn test_appearance_ranges_survive_rendering() {
    let mut snow = animation(500, viewport(800, 600));
    snow.tick_at(0.25).unwrap();

    for (p, attrs) in snow.renderer().last_frame().iter().zip(snow.field().iter()) {
        assert!((0.1..=0.4).contains(&p.opacity));
        assert!((1.0..=4.0).contains(&attrs.scale));
        assert_eq!(p.rotation, attrs.rotation.x + 0.25 * attrs.rotation.y);
    }
}

#[test]
fn test_frames_match_direct_kernel_evaluation() {
    let mut snow = animation(64, viewport(1024, 768));
    snow.tick_at(3.0).unwrap();

    let u = snow.uniforms().kernel();
    let expected = kernel::displace_all(snow.field(), &u);
    let drawn: Vec<_> = snow.renderer().last_frame().iter().map(|p| p.world).collect();
    assert_eq!(drawn, expected);
}

#[test]
fn test_flakes_fall_between_frames() {
    let mut snow = animation(1, viewport(800, 600));

    snow.tick_at(0.0).unwrap();
    let start = snow.renderer().last_frame()[0].world.y;
    snow.tick_at(0.01).unwrap();
    let end = snow.renderer().last_frame()[0].world.y;

    let speed_y = snow.field().speeds()[0].y;
    let fallen = start - end;
    // Either fell by t * speed.y * gravity, or wrapped to the top.
    let expected = 0.01 * speed_y * 25.0;
    assert!((fallen - expected).abs() < 1e-4 || (fallen - expected + 12.0).abs() < 1e-4, "fallen {fallen}");
}

// ============================================================================
// Resize and regeneration
// ============================================================================

#[test]
fn test_resize_then_regenerate() {
    let mut snow = SnowAnimation::with_seed(
        SnowConfig::default(),
        viewport(800, 600),
        HeadlessRenderer::new(viewport(800, 600)),
        800 * 20,
        9,
    )
    .unwrap();
    assert_eq!(snow.field().len(), 16_000);

    snow.handle_resize(viewport(1600, 900));
    assert!((snow.camera().aspect - 1600.0 / 900.0).abs() < 1e-6);
    assert_eq!(snow.renderer().size(), (1600, 900));
    assert_eq!(snow.field().len(), 16_000);

    snow.regenerate();
    assert_eq!(snow.field().len(), 1600 * 20);
    snow.tick_at(0.1).unwrap();
    assert_eq!(snow.renderer().last_frame().len(), 32_000);
}

#[test]
fn test_repeated_regeneration_does_not_leak() {
    let mut snow = animation(100, viewport(800, 600));
    let baseline = snow.renderer().live_resources();

    snow.regenerate();
    snow.regenerate();
    assert_eq!(snow.renderer().live_resources(), baseline);

    snow.tick_at(1.0).unwrap();
    assert_eq!(snow.renderer().last_frame().len(), snow.field().len());
}

#[test]
fn test_empty_field_renders() {
    let mut snow = animation(0, viewport(800, 600));
    assert!(snow.field().is_empty());
    for frame in 1..=10 {
        snow.tick_at(frame as f32 * 0.016).unwrap();
    }
    assert!(snow.renderer().last_frame().is_empty());
    assert_eq!(snow.renderer().frames_rendered(), 10);
}

// ============================================================================
// Sprite and config
// ============================================================================

#[test]
fn test_missing_sprite_falls_back_to_transparent() {
    let config = SnowConfig::default().with_sprite(SpriteSource::File("/missing/flake.png".into()));
    let vp = viewport(800, 600);
    let mut snow = SnowAnimation::with_seed(config, vp, HeadlessRenderer::new(vp), 10, 1).unwrap();

    let sprite = snow.renderer().installed_sprite().unwrap();
    assert!(sprite.is_transparent());
    snow.tick_at(0.5).unwrap();
    assert_eq!(snow.renderer().last_frame().len(), 10);
}

#[test]
fn test_json_config_drives_generation() {
    let config = SnowConfig::from_json_str(
        r#"{ "opacity_min": 0.5, "opacity_max": 0.5, "size_min": 2.0, "size_max": 2.0 }"#,
    )
    .unwrap();
    let mut rng = SmallRng::seed_from_u64(3);
    let field = ParticleBuffers::generate(200, &config, &mut rng);
    assert!(field.opacities().iter().all(|&o| o == 0.5));
    assert!(field.scales().iter().all(|&s| s == 2.0));
}

#[test]
fn test_stop_handle_from_another_thread() {
    let mut snow = animation(10, viewport(800, 600));
    let handle = snow.stop_handle();
    std::thread::spawn(move || handle.stop()).join().unwrap();
    assert_eq!(snow.run_frames(100, 1.0 / 60.0).unwrap(), 0);
}

#[test]
fn test_headless_point_sizes_are_positive() {
    let mut snow = animation(300, viewport(800, 600));
    snow.tick_at(2.0).unwrap();
    let view = snow.camera().view_matrix();
    for p in snow.renderer().last_frame() {
        let depth = -(view * p.world.extend(1.0)).z;
        if depth > 0.0 {
            assert!(p.point_size > 0.0);
        }
    }
}
