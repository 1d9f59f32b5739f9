use std::time::Instant;

use log::{ debug, info };

use crate::ray::Ray4D;
use crate::tuple::Tuple4D;
use crate::matrix::Matrix4D;
use crate::scene::Scene;
use crate::canvas::Canvas;
use crate::shading::{ Shader, RenderOptions };
use crate::error::{ RenderError, Result };

/// A pinhole camera which maps canvas pixels to rays into a scene.
///
/// The camera sits at the origin looking down -Z, with the canvas one unit
/// in front of it; `transform` (typically a view transformation) orients the
/// world relative to the camera. Its inverse is cached, so a camera is only
/// modified through `set_transform`.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    hsize: usize,
    vsize: usize,
    field_of_view: f64,

    half_width: f64,
    half_height: f64,
    pixel_size: f64,

    transform: Matrix4D,
    inverse: Matrix4D,
}

impl Camera {
    /// Creates a camera for an `hsize` by `vsize` canvas.
    ///
    /// Fails when the canvas is empty or `transform` is not invertible.
    ///
    /// ```
    /// # use phong_ray_tracer::camera::Camera;
    /// # use phong_ray_tracer::matrix::Matrix4D;
    /// let c = Camera::new(200, 125, std::f64::consts::FRAC_PI_2,
    ///     Matrix4D::identity()).unwrap();
    /// assert!((c.pixel_size() - 0.01).abs() < 1e-9);
    ///
    /// assert!(Camera::new(0, 125, 1.0, Matrix4D::identity()).is_err());
    /// ```
    pub fn new(hsize: usize, vsize: usize, field_of_view: f64,
        transform: Matrix4D) -> Result<Camera> {
        if hsize == 0 || vsize == 0 {
            return Err(RenderError::EmptyCanvas(hsize, vsize));
        }

        let inverse = transform.inverse()
            .ok_or(RenderError::SingularTransform)?;

        let half_view = (field_of_view / 2.0).tan();
        let aspect = (hsize as f64) / (vsize as f64);

        let (half_width, half_height) = if aspect >= 1.0 {
            (half_view, half_view / aspect)
        } else {
            (half_view * aspect, half_view)
        };

        let pixel_size = half_width * 2.0 / (hsize as f64);

        Ok(Camera {
            hsize,
            vsize,
            field_of_view,
            half_width,
            half_height,
            pixel_size,
            transform,
            inverse,
        })
    }

    /// Replaces the camera transform. On error the camera is left unchanged.
    pub fn set_transform(&mut self, transform: Matrix4D) -> Result<()> {
        self.inverse = transform.inverse()
            .ok_or(RenderError::SingularTransform)?;
        self.transform = transform;

        Ok(())
    }

    /// The horizontal size of the resultant canvas.
    pub fn hsize(&self) -> usize {
        self.hsize
    }

    /// The vertical size of the resultant canvas.
    pub fn vsize(&self) -> usize {
        self.vsize
    }

    /// The angle describing "how much" the camera can see.
    pub fn field_of_view(&self) -> f64 {
        self.field_of_view
    }

    pub fn transform(&self) -> &Matrix4D {
        &self.transform
    }

    /// The world-space size of one pixel on the canvas.
    pub fn pixel_size(&self) -> f64 {
        self.pixel_size
    }

    /// The ray from the camera through the center of pixel `(px, py)`.
    pub fn ray_for_pixel(&self, px: usize, py: usize) -> Ray4D {
        // Offsets from the edge of the canvas to the pixel's center
        let xoffset = (px as f64 + 0.5) * self.pixel_size;
        let yoffset = (py as f64 + 0.5) * self.pixel_size;

        // The camera looks toward -Z, so +X is to the left.
        let world_x = self.half_width - xoffset;
        let world_y = self.half_height - yoffset;

        let pixel = self.inverse * Tuple4D::point(world_x, world_y, -1.0);
        let origin = self.inverse * Tuple4D::point(0.0, 0.0, 0.0);
        let direction = (pixel - origin).normalize();

        Ray4D::new(origin, direction)
    }

    /// Renders a scene on the current thread, one pixel at a time.
    pub fn render(&self, scene: &Scene, options: &RenderOptions) -> Canvas {
        let started = Instant::now();
        debug!("Rendering {}x{} pixels ({} entities, {} lights, depth {})",
            self.hsize, self.vsize, scene.entities.len(), scene.lights.len(),
            options.max_depth);

        let shader = Shader::new(scene, *options);
        let mut image = Canvas::new(self.hsize, self.vsize);

        for y in 0..self.vsize {
            for x in 0..self.hsize {
                let ray = self.ray_for_pixel(x, y);
                image.write_pixel(x, y, shader.trace(&ray));
            }
        }

        info!("Rendered {}x{} in {:.2?}", self.hsize, self.vsize,
            started.elapsed());
        image
    }
}

#[cfg(test)]
use std::f64::consts::PI;

#[test]
fn pixel_size_for_horizontal_canvas() {
    let c = Camera::new(200, 125, PI / 2.0, Matrix4D::identity()).unwrap();
    assert!((c.pixel_size() - 0.01).abs() < 1e-9);
}

#[test]
fn pixel_size_for_vertical_canvas() {
    let c = Camera::new(125, 200, PI / 2.0, Matrix4D::identity()).unwrap();
    assert!((c.pixel_size() - 0.01).abs() < 1e-9);
}

#[test]
fn camera_rejects_bad_parameters() {
    assert!(matches!(Camera::new(0, 10, PI / 2.0, Matrix4D::identity()),
        Err(RenderError::EmptyCanvas(0, 10))));
    assert!(matches!(Camera::new(10, 10, PI / 2.0, Matrix4D::zero()),
        Err(RenderError::SingularTransform)));

    let mut c = Camera::new(10, 10, PI / 2.0, Matrix4D::identity()).unwrap();
    assert!(c.set_transform(Matrix4D::scaling(1.0, 1.0, 0.0)).is_err());
    assert_eq!(*c.transform(), Matrix4D::identity());
}

#[test]
fn camera_dimensions_are_read_only() {
    let c = Camera::new(160, 120, PI / 2.0, Matrix4D::identity()).unwrap();

    assert_eq!(c.hsize(), 160);
    assert_eq!(c.vsize(), 120);
    assert_eq!(c.field_of_view(), PI / 2.0);
    assert_eq!(c.render(&Scene::empty(), &RenderOptions::default()).width, 160);
}

#[test]
fn ray_through_center() {
    let c = Camera::new(201, 101, PI / 2.0, Matrix4D::identity()).unwrap();
    let r = c.ray_for_pixel(100, 50);

    assert_eq!(r.origin, Tuple4D::point(0.0, 0.0, 0.0));
    assert_eq!(r.direction, Tuple4D::vector(0.0, 0.0, -1.0));
}

#[test]
fn ray_through_corner() {
    let c = Camera::new(201, 101, PI / 2.0, Matrix4D::identity()).unwrap();
    let r = c.ray_for_pixel(0, 0);

    assert_eq!(r.origin, Tuple4D::point(0.0, 0.0, 0.0));
    assert_eq!(r.direction, Tuple4D::vector(0.66519, 0.33259, -0.66851));
}

#[test]
fn ray_when_camera_transformed() {
    let c = Camera::new(201, 101, PI / 2.0,
        Matrix4D::identity().translate(0.0, -2.0, 5.0).rotate_y(PI / 4.0))
        .unwrap();
    let r = c.ray_for_pixel(100, 50);

    let k = 2.0f64.sqrt() / 2.0;
    assert_eq!(r.origin, Tuple4D::point(0.0, 2.0, -5.0));
    assert_eq!(r.direction, Tuple4D::vector(k, 0.0, -k));
}

#[test]
fn render_default_scene() {
    use crate::color::Color;

    let s = Scene::default();
    let c = Camera::new(11, 11, PI / 2.0, Matrix4D::view_transform(
        Tuple4D::point(0.0, 0.0, -5.0),
        Tuple4D::point(0.0, 0.0, 0.0),
        Tuple4D::vector(0.0, 1.0, 0.0)
    )).unwrap();

    let image = c.render(&s, &RenderOptions::default());
    assert_eq!(image.read_pixel(5, 5), Some(Color::rgb(0.38066, 0.47583, 0.2855)));
}
