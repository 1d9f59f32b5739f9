use std::time::Instant;

use log::{ debug, info };
use rayon::prelude::*;

use crate::scene::Scene;
use crate::camera::Camera;
use crate::canvas::Canvas;
use crate::shading::{ Shader, RenderOptions };

/// Renders a scene using every thread in rayon's global pool.
///
/// The canvas is split into rows and each row is shaded by one worker; the
/// scene is only read, so rows never contend for anything. The result is
/// the same canvas `Camera::render` produces.
pub fn render_parallel(camera: &Camera, scene: &Scene, options: &RenderOptions)
    -> Canvas {
    let started = Instant::now();
    debug!("Rendering {}x{} pixels on {} threads",
        camera.hsize(), camera.vsize(),
        rayon::current_num_threads());

    let shader = Shader::new(scene, *options);
    let mut image = Canvas::new(camera.hsize(), camera.vsize());
    let width = image.width;

    image.pixels_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = shader.trace(&camera.ray_for_pixel(x, y));
            }
        });

    info!("Rendered {}x{} in {:.2?}", camera.hsize(), camera.vsize(),
        started.elapsed());
    image
}

#[test]
fn parallel_render_matches_sequential() {
    use crate::tuple::Tuple4D;
    use crate::matrix::Matrix4D;
    use crate::shape::Shape;
    use crate::entity::Entity;
    use crate::material::Material;

    let mut scene = Scene::default();
    scene.add_entity(Entity::new(Shape::plane())
        .with_material(Material { reflective: 0.5, ..Material::default() })
        .with_transform(Matrix4D::translation(0.0, -1.0, 0.0))
        .unwrap());

    let camera = Camera::new(23, 17, std::f64::consts::PI / 3.0,
        Matrix4D::view_transform(
            Tuple4D::point(0.0, 1.5, -5.0),
            Tuple4D::point(0.0, 0.0, 0.0),
            Tuple4D::vector(0.0, 1.0, 0.0)
        )).unwrap();
    let options = RenderOptions::default();

    assert_eq!(render_parallel(&camera, &scene, &options),
        camera.render(&scene, &options));
}
