// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::collections::VecDeque;

/// Find border-following contours in a binary mask using 8-connectivity
///
/// Contours are discovered in raster-scan order (row-major, top-left to
/// bottom-right) and every border is classified as either an outer border or
/// a hole border. Each contour records an optional parent: holes point at
/// their enclosing outer border, and any object nested inside a hole points
/// at that hole. A contour with no parent is a top-level object boundary.
///
/// # Arguments
///
/// * `width` - Width of mask
/// * `height` - Height of mask
/// * `mask` - A row-major mask buffer where `true` marks foreground
///
/// # References
///
/// Adapted/modified from: https://github.com/image-rs/imageproc
///
/// # Examples
///
/// ```
/// use duckbox_core::cv::find_contours;
///
/// let width = 3;
/// let height = 3;
/// let mask = vec![true, true, false, true, true, false, false, false, false];
/// let contours = find_contours(width, height, &mask);
///
/// assert_eq!(contours.len(), 1);
/// assert_eq!(contours[0].as_points(), &vec![[0, 0], [0, 1], [1, 1], [1, 0]]);
/// assert!(contours[0].is_top_level());
/// ```
pub fn find_contours(width: u32, height: u32, mask: &[bool]) -> Vec<Contour> {
    let width = width as usize;
    let height = height as usize;
    let padded_width = width + 2;
    let padded_height = height + 2;

    let at = |x: usize, y: usize| x + padded_width * y;

    let mut image_values = vec![0i32; padded_height * padded_width];

    for y in 0..height {
        for x in 0..width {
            image_values[at(x + 1, y + 1)] = if mask[y * width + x] { 1 } else { 0 };
        }
    }

    let mut diffs = VecDeque::from(vec![
        [-1, 0],  // West
        [-1, -1], // Northwest
        [0, -1],  // North
        [1, -1],  // Northeast
        [1, 0],   // East
        [1, 1],   // Southeast
        [0, 1],   // South
        [-1, 1],  // Southwest
    ]);

    let mut contours: Vec<Contour> = Vec::new();
    let mut curr_border_num = 1;

    for y in 1..=height {
        // The last border met on the current row; resets every row scan
        let mut parent_border_num = 1;

        for x in 1..=width {
            if image_values[at(x, y)] == 0 {
                continue;
            }

            let curr = (x as i32, y as i32);

            let start = if image_values[at(x, y)] == 1 && image_values[at(x - 1, y)] == 0 {
                Some((true, (x as i32 - 1, y as i32)))
            } else if image_values[at(x, y)] > 0 && image_values[at(x + 1, y)] == 0 {
                if image_values[at(x, y)] > 1 {
                    parent_border_num = image_values[at(x, y)] as usize;
                }
                Some((false, (x as i32 + 1, y as i32)))
            } else {
                None
            };

            if let Some((is_outer_border, adjacent_point)) = start {
                curr_border_num += 1;

                let border_type = if is_outer_border {
                    BorderType::Outer
                } else {
                    BorderType::Hole
                };

                let parent = if parent_border_num > 1 {
                    let parent_index = parent_border_num - 2;
                    let parent_contour = &contours[parent_index];
                    if (border_type == BorderType::Outer)
                        ^ (parent_contour.border_type == BorderType::Outer)
                    {
                        Some(parent_index)
                    } else {
                        parent_contour.parent
                    }
                } else {
                    None
                };

                let mut contour_points: Vec<[u32; 2]> = Vec::new();
                rotate_to_value(
                    &mut diffs,
                    [adjacent_point.0 - curr.0, adjacent_point.1 - curr.1],
                );

                let pos1_option = diffs.iter().find_map(|&diff| {
                    let nx = curr.0 + diff[0];
                    let ny = curr.1 + diff[1];
                    if nx >= 0
                        && nx < padded_width as i32
                        && ny >= 0
                        && ny < padded_height as i32
                        && image_values[at(nx as usize, ny as usize)] != 0
                    {
                        Some((nx, ny))
                    } else {
                        None
                    }
                });

                if let Some(pos1) = pos1_option {
                    let mut pos2 = pos1;
                    let mut pos3 = curr;

                    loop {
                        contour_points.push([pos3.0 as u32 - 1, pos3.1 as u32 - 1]);
                        rotate_to_value(&mut diffs, [pos2.0 - pos3.0, pos2.1 - pos3.1]);
                        let pos4 = diffs
                            .iter()
                            .rev()
                            .find_map(|&diff| {
                                let nx = pos3.0 + diff[0];
                                let ny = pos3.1 + diff[1];
                                if nx >= 0
                                    && nx < padded_width as i32
                                    && ny >= 0
                                    && ny < padded_height as i32
                                    && image_values[at(nx as usize, ny as usize)] != 0
                                {
                                    Some((nx, ny))
                                } else {
                                    None
                                }
                            })
                            .unwrap();

                        let mut is_right_edge = false;
                        for &diff in diffs.iter().rev() {
                            if diff == [pos4.0 - pos3.0, pos4.1 - pos3.1] {
                                break;
                            }
                            if diff == [1, 0] {
                                is_right_edge = true;
                                break;
                            }
                        }

                        if pos3.0 as usize == width || is_right_edge {
                            image_values[at(pos3.0 as usize, pos3.1 as usize)] = -curr_border_num;
                        } else if image_values[at(pos3.0 as usize, pos3.1 as usize)] == 1 {
                            image_values[at(pos3.0 as usize, pos3.1 as usize)] = curr_border_num;
                        }

                        if pos4 == curr && pos3 == pos1 {
                            break;
                        }

                        pos2 = pos3;
                        pos3 = pos4;
                    }
                } else {
                    contour_points.push([x as u32 - 1, y as u32 - 1]);
                    image_values[at(x, y)] = -curr_border_num;
                }

                contours.push(Contour::new(contour_points, border_type, parent));
            }

            if image_values[at(x, y)] != 1 {
                parent_border_num = image_values[at(x, y)].unsigned_abs() as usize;
            }
        }
    }

    contours
}

/// Contour storing the traced outline of one border in a mask
#[derive(Debug, Clone)]
pub struct Contour {
    points: Vec<[u32; 2]>,
    border_type: BorderType,
    parent: Option<usize>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BorderType {
    Outer,
    Hole,
}

impl Contour {
    pub fn new(points: Vec<[u32; 2]>, border_type: BorderType, parent: Option<usize>) -> Self {
        Contour {
            points,
            border_type,
            parent,
        }
    }

    pub fn as_points(&self) -> &Vec<[u32; 2]> {
        &self.points
    }

    pub fn into_points(self) -> Vec<[u32; 2]> {
        self.points
    }

    pub fn border_type(&self) -> &BorderType {
        &self.border_type
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Check if the contour is a top-level object boundary
    ///
    /// Hole borders and borders nested inside holes have parents and are not
    /// top-level.
    pub fn is_top_level(&self) -> bool {
        self.parent.is_none()
    }

    /// Axis-aligned bounding rectangle as `[min_x, min_y, max_x, max_y]`
    ///
    /// The maximum coordinates are one past the last foreground pixel, so a
    /// single-pixel contour at (x, y) yields `[x, y, x + 1, y + 1]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use duckbox_core::cv::find_contours;
    ///
    /// let mask = vec![false, false, false, false, true, false, false, false, false];
    /// let contours = find_contours(3, 3, &mask);
    ///
    /// assert_eq!(contours[0].bounding_rect(), [1, 1, 2, 2]);
    /// ```
    pub fn bounding_rect(&self) -> [u32; 4] {
        if self.points.is_empty() {
            return [0, 0, 0, 0];
        }

        let (mut min_x, mut min_y) = (u32::MAX, u32::MAX);
        let (mut max_x, mut max_y) = (0u32, 0u32);

        for point in &self.points {
            min_x = min_x.min(point[0]);
            min_y = min_y.min(point[1]);
            max_x = max_x.max(point[0]);
            max_y = max_y.max(point[1]);
        }

        [min_x, min_y, max_x + 1, max_y + 1]
    }
}

fn rotate_to_value(values: &mut VecDeque<[i32; 2]>, value: [i32; 2]) {
    if let Some(pos) = values.iter().position(|&v| v == value) {
        values.rotate_left(pos);
    }
}
