//! Simple path tracer example.
//!
//! Renders three large spheres over a field of small random ones, in
//! parallel, and saves the result as PPM.

use std::error::Error;
use std::sync::Arc;

use ember_renderer::{
    build_world, render_parallel, save_ppm, Background, Camera, CameraConfig, Color, Dielectric,
    Hittable, HittableList, Lambertian, Material, Metal, RenderConfig, Sphere, Vec3,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() -> Result<(), Box<dyn Error>> {
    println!("Ember Path Tracer - Simple Example");
    println!("==================================");

    let aspect_ratio = 16.0 / 9.0;
    let mut rng = StdRng::seed_from_u64(2024);

    // Build the scene
    let start = std::time::Instant::now();
    let world = build_world(build_scene(&mut rng), 0.0, 1.0, &mut rng)?;
    println!("Scene built in {:?}", start.elapsed());

    let camera = Camera::new(
        &CameraConfig::default()
            .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
            .with_lens(20.0, 0.1, 10.0)
            .with_aspect_ratio(aspect_ratio),
    );

    let config = RenderConfig::default()
        .with_width(400, aspect_ratio)
        .with_quality(32, 10)
        .with_background(Background::sky());

    println!(
        "Rendering {}x{} @ {} spp...",
        config.image_width, config.image_height, config.samples_per_pixel
    );

    let start = std::time::Instant::now();
    let image = render_parallel(&camera, &world, &config);
    println!("Rendered in {:?}", start.elapsed());

    let filename = "output.ppm";
    save_ppm(&image, filename)?;
    println!("Saved to {}", filename);

    Ok(())
}

fn build_scene(rng: &mut StdRng) -> HittableList {
    let mut world = HittableList::new();
    let glass = Material::from(Dielectric::new(1.5)).shared();

    // Ground
    world.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        Material::from(Lambertian::new(Color::new(0.5, 0.5, 0.5))).shared(),
    ));

    // Three main spheres
    world.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass.clone()));
    world.add(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        Material::from(Lambertian::new(Color::new(0.4, 0.2, 0.1))).shared(),
    ));
    world.add(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Material::from(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)).shared(),
    ));

    // Small random spheres
    for a in -5..5 {
        for b in -5..5 {
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let choose_mat: f32 = rng.gen();
            let material: Arc<Material> = if choose_mat < 0.8 {
                let albedo = Color::new(
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                    rng.gen::<f32>() * rng.gen::<f32>(),
                );
                Material::from(Lambertian::new(albedo)).shared()
            } else if choose_mat < 0.95 {
                let albedo = Color::new(
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                    rng.gen_range(0.5..1.0),
                );
                Material::from(Metal::new(albedo, rng.gen_range(0.0..0.5))).shared()
            } else {
                glass.clone()
            };

            world.add(Hittable::from(Sphere::new(center, 0.2, material)));
        }
    }

    println!("Created {} objects", world.len());
    world
}
