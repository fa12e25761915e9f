//! Demo scenes.
//!
//! Each builder returns the scene objects as a plain list plus the camera and
//! background that frame them; [`build`] turns the list into a BVH.

use std::f32::consts::FRAC_PI_4;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use ember_core::{ImageTexture, NoiseTexture, Texture};
use ember_renderer::{
    build_world, AaRect, Background, CameraConfig, Color, ConstantMedium, Cuboid, Dielectric,
    DiffuseLight, Hittable, HittableList, Lambertian, Material, Metal, MovingSphere, RotateY,
    Sphere, Translate, Triangle, Vec3,
};
use rand::{Rng, RngCore};

use crate::settings::{RenderSettings, SceneKind};

/// A ready-to-render scene.
pub struct Scene {
    pub world: Hittable,
    pub camera: CameraConfig,
    pub background: Background,
}

/// Scene objects before the hierarchy is built.
struct SceneParts {
    objects: HittableList,
    camera: CameraConfig,
    background: Background,
}

/// Build the scene named in `settings`, with its camera matched to the
/// output aspect ratio.
pub fn build(settings: &RenderSettings, rng: &mut dyn RngCore) -> Result<Scene> {
    let parts = match settings.scene {
        SceneKind::RandomSpheres => random_spheres(rng)?,
        SceneKind::TwoSpheres => two_spheres(),
        SceneKind::TwoPerlinSpheres => two_perlin_spheres(rng),
        SceneKind::RefractiveDielectrics => refractive_dielectrics(),
        SceneKind::CameraFovTest => camera_fov_test(),
        SceneKind::SimpleLight => simple_light(rng),
        SceneKind::CornellBox => cornell_box(),
        SceneKind::CornellSmoke => cornell_smoke()?,
        SceneKind::TriangleTest => triangle_test(),
        SceneKind::Earth => {
            let path = settings
                .image
                .as_deref()
                .context("the earth scene needs a texture, pass --image <PATH>")?;
            earth(path)?
        }
    };

    let camera = parts.camera.with_aspect_ratio(settings.aspect_ratio);
    log::info!(
        "Scene '{}' has {} top-level objects",
        settings.scene,
        parts.objects.len()
    );

    let world = build_world(parts.objects, camera.time0, camera.time1, rng)
        .with_context(|| format!("failed to build scene '{}'", settings.scene))?;

    Ok(Scene {
        world,
        camera,
        background: parts.background,
    })
}

fn lambertian(color: Color) -> Arc<Material> {
    Material::from(Lambertian::new(color)).shared()
}

fn textured(texture: Texture) -> Arc<Material> {
    Material::from(Lambertian::from_texture(Arc::new(texture))).shared()
}

fn light(color: Color) -> Arc<Material> {
    Material::from(DiffuseLight::new(color)).shared()
}

fn random_color(rng: &mut dyn RngCore, min: f32, max: f32) -> Color {
    Color::new(
        rng.gen_range(min..max),
        rng.gen_range(min..max),
        rng.gen_range(min..max),
    )
}

/// Camera looking at the origin from (13, 2, 3), focused 10 units away.
fn outdoor_camera(aperture: f32) -> CameraConfig {
    CameraConfig::default()
        .with_position(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, Vec3::Y)
        .with_lens(20.0, aperture, 10.0)
}

fn random_spheres(rng: &mut dyn RngCore) -> Result<SceneParts> {
    let mut objects = HittableList::new();

    let checker = Texture::checker(Color::new(0.2, 0.3, 0.1), Color::new(0.9, 0.9, 0.9));
    objects.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        textured(checker),
    ));

    let glass = Material::from(Dielectric::new(1.5)).shared();

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat: f32 = rng.gen();
            let center = Vec3::new(
                a as f32 + 0.9 * rng.gen::<f32>(),
                0.2,
                b as f32 + 0.9 * rng.gen::<f32>(),
            );

            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            if choose_mat < 0.8 {
                // diffuse, bouncing during the shutter
                let albedo = random_color(rng, 0.0, 1.0) * random_color(rng, 0.0, 1.0);
                let center1 = center + Vec3::new(0.0, rng.gen_range(0.0..0.5), 0.0);
                objects.add(MovingSphere::new(
                    center,
                    center1,
                    0.0,
                    1.0,
                    0.2,
                    lambertian(albedo),
                )?);
            } else if choose_mat < 0.95 {
                let albedo = random_color(rng, 0.5, 1.0);
                let fuzz = rng.gen_range(0.0..0.5);
                objects.add(Sphere::new(
                    center,
                    0.2,
                    Material::from(Metal::new(albedo, fuzz)).shared(),
                ));
            } else {
                objects.add(Sphere::new(center, 0.2, glass.clone()));
            }
        }
    }

    objects.add(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass));
    objects.add(Sphere::new(
        Vec3::new(-4.0, 1.0, 0.0),
        1.0,
        lambertian(Color::new(0.4, 0.2, 0.1)),
    ));
    objects.add(Sphere::new(
        Vec3::new(4.0, 1.0, 0.0),
        1.0,
        Material::from(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0)).shared(),
    ));

    Ok(SceneParts {
        objects,
        camera: outdoor_camera(0.1),
        background: Background::sky(),
    })
}

fn two_spheres() -> SceneParts {
    let checker = Arc::new(Texture::checker(
        Color::new(0.2, 0.3, 0.1),
        Color::new(0.9, 0.9, 0.9),
    ));
    let material = Material::from(Lambertian::from_texture(checker)).shared();

    let mut objects = HittableList::new();
    objects.add(Sphere::new(Vec3::new(0.0, -10.0, 0.0), 10.0, material.clone()));
    objects.add(Sphere::new(Vec3::new(0.0, 10.0, 0.0), 10.0, material));

    SceneParts {
        objects,
        camera: outdoor_camera(0.0),
        background: Background::sky(),
    }
}

fn perlin_spheres(rng: &mut dyn RngCore) -> HittableList {
    let noise = textured(Texture::Noise(NoiseTexture::new(4.0, rng)));

    let mut objects = HittableList::new();
    objects.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        noise.clone(),
    ));
    objects.add(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, noise));
    objects
}

fn two_perlin_spheres(rng: &mut dyn RngCore) -> SceneParts {
    SceneParts {
        objects: perlin_spheres(rng),
        camera: outdoor_camera(0.1),
        background: Background::sky(),
    }
}

fn refractive_dielectrics() -> SceneParts {
    let glass = Material::from(Dielectric::new(1.5)).shared();

    let mut objects = HittableList::new();
    objects.add(Sphere::new(
        Vec3::new(0.0, -100.5, -1.0),
        100.0,
        lambertian(Color::new(0.8, 0.8, 0.0)),
    ));
    objects.add(Sphere::new(
        Vec3::new(0.0, 0.0, -1.0),
        0.5,
        lambertian(Color::new(0.1, 0.2, 0.5)),
    ));
    // Hollow glass: an outer shell and a slightly smaller inward-facing one
    objects.add(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass.clone()));
    objects.add(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), -0.45, glass));
    objects.add(Sphere::new(
        Vec3::new(1.0, 0.0, -1.0),
        0.5,
        Material::from(Metal::new(Color::new(0.8, 0.6, 0.2), 0.0)).shared(),
    ));

    let look_from = Vec3::new(-2.0, 2.0, 1.0);
    let look_at = Vec3::new(0.0, 0.0, -1.0);

    SceneParts {
        objects,
        camera: CameraConfig::default()
            .with_position(look_from, look_at, Vec3::Y)
            .with_lens(20.0, 0.0, (look_from - look_at).length()),
        background: Background::sky(),
    }
}

fn camera_fov_test() -> SceneParts {
    let r = FRAC_PI_4.cos();

    let mut objects = HittableList::new();
    objects.add(Sphere::new(
        Vec3::new(-r, 0.0, -1.0),
        r,
        lambertian(Color::new(0.0, 0.0, 1.0)),
    ));
    objects.add(Sphere::new(
        Vec3::new(r, 0.0, -1.0),
        r,
        lambertian(Color::new(1.0, 0.0, 0.0)),
    ));

    SceneParts {
        objects,
        camera: CameraConfig::default(),
        background: Background::sky(),
    }
}

fn simple_light(rng: &mut dyn RngCore) -> SceneParts {
    let mut objects = perlin_spheres(rng);
    objects.add(AaRect::xy(
        (3.0, 5.0),
        (1.0, 3.0),
        -2.0,
        light(Color::splat(4.0)),
    ));

    SceneParts {
        objects,
        camera: CameraConfig::default()
            .with_position(Vec3::new(26.0, 3.0, 6.0), Vec3::new(0.0, 2.0, 0.0), Vec3::Y)
            .with_lens(20.0, 0.0, 10.0),
        background: Background::Solid(Color::ZERO),
    }
}

/// The five walls of the Cornell box, without a light.
fn cornell_walls() -> HittableList {
    let red = lambertian(Color::new(0.65, 0.05, 0.05));
    let white = lambertian(Color::splat(0.73));
    let green = lambertian(Color::new(0.12, 0.45, 0.15));

    let mut walls = HittableList::new();
    walls.add(AaRect::yz((0.0, 555.0), (0.0, 555.0), 555.0, green));
    walls.add(AaRect::yz((0.0, 555.0), (0.0, 555.0), 0.0, red));
    walls.add(AaRect::xz((0.0, 555.0), (0.0, 555.0), 0.0, white.clone()));
    walls.add(AaRect::xz((0.0, 555.0), (0.0, 555.0), 555.0, white.clone()));
    walls.add(AaRect::xy((0.0, 555.0), (0.0, 555.0), 555.0, white));
    walls
}

/// A box with one corner at the origin, turned about Y and moved into place.
fn placed_box(size: Vec3, angle_degrees: f32, offset: Vec3, material: Arc<Material>) -> Hittable {
    let cuboid = Hittable::from(Cuboid::new(Vec3::ZERO, size, material)).shared();
    let rotated = Hittable::from(RotateY::new(cuboid, angle_degrees)).shared();
    Hittable::from(Translate::new(rotated, offset))
}

fn cornell_camera() -> CameraConfig {
    CameraConfig::default()
        .with_position(
            Vec3::new(278.0, 278.0, -800.0),
            Vec3::new(278.0, 278.0, 0.0),
            Vec3::Y,
        )
        .with_lens(40.0, 0.0, 10.0)
}

fn cornell_box() -> SceneParts {
    let white = lambertian(Color::splat(0.73));

    let mut objects = cornell_walls();
    objects.add(AaRect::xz(
        (213.0, 343.0),
        (227.0, 332.0),
        554.0,
        light(Color::splat(15.0)),
    ));
    objects.add(placed_box(
        Vec3::new(165.0, 330.0, 165.0),
        15.0,
        Vec3::new(265.0, 0.0, 295.0),
        white.clone(),
    ));
    objects.add(placed_box(
        Vec3::splat(165.0),
        -18.0,
        Vec3::new(130.0, 0.0, 65.0),
        white,
    ));

    SceneParts {
        objects,
        camera: cornell_camera(),
        background: Background::Solid(Color::ZERO),
    }
}

fn cornell_smoke() -> Result<SceneParts> {
    let white = lambertian(Color::splat(0.73));

    let mut objects = cornell_walls();
    objects.add(AaRect::xz(
        (113.0, 443.0),
        (127.0, 432.0),
        554.0,
        light(Color::splat(7.0)),
    ));

    let tall = placed_box(
        Vec3::new(165.0, 330.0, 165.0),
        15.0,
        Vec3::new(265.0, 0.0, 295.0),
        white.clone(),
    );
    let short = placed_box(
        Vec3::splat(165.0),
        -18.0,
        Vec3::new(130.0, 0.0, 65.0),
        white,
    );

    objects.add(ConstantMedium::from_color(tall.shared(), 0.01, Color::ZERO)?);
    objects.add(ConstantMedium::from_color(short.shared(), 0.01, Color::ONE)?);

    Ok(SceneParts {
        objects,
        camera: cornell_camera(),
        background: Background::Solid(Color::ZERO),
    })
}

fn triangle_test() -> SceneParts {
    let mut objects = HittableList::new();
    objects.add(Sphere::new(
        Vec3::new(0.0, -1000.0, 0.0),
        1000.0,
        lambertian(Color::splat(0.5)),
    ));

    // Counter-clockwise seen from the camera, so the front faces it
    objects.add(Triangle::new(
        Vec3::new(-2.0, 0.0, 0.0),
        Vec3::new(-1.0, 2.0, 1.0),
        Vec3::new(0.0, 0.0, 2.0),
        lambertian(Color::new(0.8, 0.2, 0.2)),
    ));
    objects.add(Triangle::new(
        Vec3::new(0.0, 0.0, -2.0),
        Vec3::new(1.0, 2.0, -1.0),
        Vec3::new(2.0, 0.0, 0.0),
        Material::from(Metal::new(Color::new(0.8, 0.8, 0.9), 0.05)).shared(),
    ));
    objects.add(Triangle::new(
        Vec3::new(-1.0, 0.0, -1.0),
        Vec3::new(0.0, 3.0, 0.0),
        Vec3::new(1.0, 0.0, 1.0),
        Material::from(Dielectric::new(1.5)).shared(),
    ));

    SceneParts {
        objects,
        camera: outdoor_camera(0.0),
        background: Background::sky(),
    }
}

fn earth(path: &Path) -> Result<SceneParts> {
    let image = ImageTexture::load(path)
        .with_context(|| format!("failed to load earth texture {}", path.display()))?;

    let mut objects = HittableList::new();
    objects.add(Sphere::new(Vec3::ZERO, 2.0, textured(Texture::Image(image))));

    Ok(SceneParts {
        objects,
        camera: outdoor_camera(0.0),
        background: Background::sky(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_renderer::{Camera, Interval, Ray};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn settings_for(scene: SceneKind) -> RenderSettings {
        RenderSettings {
            scene,
            ..RenderSettings::default()
        }
    }

    #[test]
    fn test_every_scene_builds() {
        let mut rng = StdRng::seed_from_u64(0);

        for kind in SceneKind::ALL {
            if kind == SceneKind::Earth {
                continue;
            }
            let scene = build(&settings_for(kind), &mut rng)
                .unwrap_or_else(|err| panic!("{kind} failed: {err:#}"));
            assert!(matches!(scene.world, Hittable::Bvh(_)), "{kind} is not a BVH");
        }
    }

    #[test]
    fn test_center_ray_hits_something() {
        let mut rng = StdRng::seed_from_u64(1);

        for kind in [
            SceneKind::TwoSpheres,
            SceneKind::SimpleLight,
            SceneKind::CornellBox,
            SceneKind::TriangleTest,
        ] {
            let scene = build(&settings_for(kind), &mut rng).expect("scene builds");
            let camera = Camera::new(&scene.camera);
            let ray: Ray = camera.get_ray(0.5, 0.5, &mut rng);

            assert!(
                scene
                    .world
                    .hit(&ray, Interval::new(0.001, f32::INFINITY), &mut rng)
                    .is_some(),
                "center of {kind} sees nothing"
            );
        }
    }

    #[test]
    fn test_camera_uses_output_aspect_ratio() {
        let mut rng = StdRng::seed_from_u64(2);
        let settings = RenderSettings {
            aspect_ratio: 1.0,
            ..settings_for(SceneKind::CornellBox)
        };

        let scene = build(&settings, &mut rng).expect("scene builds");
        assert_eq!(scene.camera.aspect_ratio, 1.0);
        assert_eq!(scene.background, Background::Solid(Color::ZERO));
    }

    #[test]
    fn test_earth_needs_an_image() {
        let mut rng = StdRng::seed_from_u64(0);

        let err = build(&settings_for(SceneKind::Earth), &mut rng)
            .err()
            .expect("no image given");
        assert!(err.to_string().contains("--image"));

        let missing = RenderSettings {
            image: Some("/nonexistent/earthmap.jpg".into()),
            ..settings_for(SceneKind::Earth)
        };
        let err = build(&missing, &mut rng).err().expect("image does not exist");
        assert!(format!("{err:#}").contains("failed to load earth texture"));
    }
}
