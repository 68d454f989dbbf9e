use image::{DynamicImage, GenericImageView, GrayImage, Luma};

use crate::{Cell, GridMap};

/// Pixel value written for cells on the path
pub const PATH_LUMA: u8 = 128;

/// Threshold the image into a grid: pixels at least as bright as `threshold`
/// are open, darker ones are walls
pub fn parse_img(img: &DynamicImage, threshold: u8) -> Result<GridMap, anyhow::Error> {
    let width = img.width() as usize;
    let height = img.height() as usize;

    let luma = img.to_luma8();
    let cells = luma
        .pixels()
        .map(|p| {
            if p.0[0] < threshold {
                Cell::Blocked
            } else {
                Cell::Open
            }
        })
        .collect();

    Ok(GridMap::from_cells(height, width, cells)?)
}

/// Render the grid as a grayscale image: walls black, open cells white and
/// the path in between
pub fn render_img(grid: &GridMap) -> GrayImage {
    let columns = grid.columns();

    GrayImage::from_fn(columns as u32, grid.rows() as u32, |x, y| {
        let cell = grid.cells()[y as usize * columns + x as usize];
        Luma([match cell {
            Cell::Blocked => 0,
            Cell::Open => 255,
            Cell::OnPath => PATH_LUMA,
        }])
    })
}

#[cfg(test)]
mod test {

    use super::*;
    use crate::Point;

    fn maze_image() -> DynamicImage {
        // white corridor along the top and right edge, black elsewhere
        let img = GrayImage::from_fn(4, 3, |x, y| {
            if y == 0 || x == 3 {
                Luma([255])
            } else {
                Luma([0])
            }
        });
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn test_parse_img() {
        let map = parse_img(&maze_image(), 128).unwrap();

        assert_eq!(map.rows(), 3);
        assert_eq!(map.columns(), 4);
        assert_eq!(map.to_string(), "....\n###.\n###.\n");
    }

    #[test]
    fn test_threshold() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_fn(3, 1, |x, _| Luma([x as u8 * 100])));

        assert_eq!(parse_img(&img, 100).unwrap().to_string(), "#..\n");
        assert_eq!(parse_img(&img, 101).unwrap().to_string(), "##.\n");
    }

    #[test]
    fn test_empty_image() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(0, 0));
        assert!(parse_img(&img, 128).is_err());
    }

    #[test]
    fn test_render_img() {
        let mut map = parse_img(&maze_image(), 128).unwrap();
        map.mark_on_path(Point::new(0, 3)).unwrap();

        let img = render_img(&map);
        assert_eq!(img.dimensions(), (4, 3));
        assert_eq!(img.get_pixel(0, 0), &Luma([255]));
        assert_eq!(img.get_pixel(0, 1), &Luma([0]));
        assert_eq!(img.get_pixel(3, 0), &Luma([PATH_LUMA]));

        // rendering and parsing again keeps the layout, the path counts as open
        let reparsed = parse_img(&DynamicImage::ImageLuma8(img), 128).unwrap();
        assert_eq!(reparsed.rows(), map.rows());
        assert_eq!(reparsed.open_cells(), map.open_cells());
    }
}
