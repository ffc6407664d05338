use crate::types::{NormalizedBox, PixelBox};

fn clamp_unit(value: f64) -> f64 {
    value.min(1.0).max(0.0)
}

/// Convert a pixel box `(x1, y1, width, height)` to YOLO center/size form.
///
/// Every output is clamped to `[0, 1]` independently, so boxes reaching past the
/// image border keep their visible part instead of producing out-of-range labels.
/// `image_width` and `image_height` must be positive.
pub fn normalize(bbox: &PixelBox, image_width: u32, image_height: u32) -> NormalizedBox {
    let image_width = image_width as f64;
    let image_height = image_height as f64;

    NormalizedBox {
        x_center: clamp_unit((bbox.x1 + bbox.width / 2.0) / image_width),
        y_center: clamp_unit((bbox.y1 + bbox.height / 2.0) / image_height),
        width: clamp_unit(bbox.width / image_width),
        height: clamp_unit(bbox.height / image_height),
    }
}

/// Map a normalized box back to pixel units. Exact inverse of [`normalize`] for
/// boxes that lie inside the image.
pub fn denormalize(bbox: &NormalizedBox, image_width: u32, image_height: u32) -> PixelBox {
    let image_width = image_width as f64;
    let image_height = image_height as f64;
    let width = bbox.width * image_width;
    let height = bbox.height * image_height;

    PixelBox {
        x1: bbox.x_center * image_width - width / 2.0,
        y1: bbox.y_center * image_height - height / 2.0,
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_normalize_inside_image() {
        let bbox = PixelBox {
            x1: 10.0,
            y1: 10.0,
            width: 10.0,
            height: 10.0,
        };
        let norm = normalize(&bbox, 100, 100);

        assert!((norm.x_center - 0.15).abs() < EPS);
        assert!((norm.y_center - 0.15).abs() < EPS);
        assert!((norm.width - 0.1).abs() < EPS);
        assert!((norm.height - 0.1).abs() < EPS);
    }

    #[test]
    fn test_normalize_round_trip() {
        let boxes = [
            PixelBox {
                x1: 0.0,
                y1: 0.0,
                width: 1920.0,
                height: 1080.0,
            },
            PixelBox {
                x1: 480.5,
                y1: 270.25,
                width: 64.0,
                height: 32.0,
            },
            PixelBox {
                x1: 1900.0,
                y1: 1000.0,
                width: 20.0,
                height: 80.0,
            },
        ];

        for bbox in boxes {
            let norm = normalize(&bbox, 1920, 1080);
            for v in [norm.x_center, norm.y_center, norm.width, norm.height] {
                assert!((0.0..=1.0).contains(&v));
            }
            let back = denormalize(&norm, 1920, 1080);
            assert!((back.x1 - bbox.x1).abs() < 1e-6);
            assert!((back.y1 - bbox.y1).abs() < 1e-6);
            assert!((back.width - bbox.width).abs() < 1e-6);
            assert!((back.height - bbox.height).abs() < 1e-6);
        }
    }

    #[test]
    fn test_normalize_clamps_outside_image() {
        let bbox = PixelBox {
            x1: 1920.0 + 100.0,
            y1: -500.0,
            width: 4000.0,
            height: 10.0,
        };
        let norm = normalize(&bbox, 1920, 1080);

        assert_eq!(norm.x_center, 1.0);
        assert_eq!(norm.y_center, 0.0);
        assert_eq!(norm.width, 1.0);
        assert!((norm.height - 10.0 / 1080.0).abs() < EPS);
    }
}
