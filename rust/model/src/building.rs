// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Stories and the building container.
//!
//! All elements live in per-story flat vectors and reference each other by
//! string id — no owning back-pointers. [`Building::finalize`] is the single
//! tagging pass: it assigns sequential ids/tags where missing, rebuilds the
//! wall lookup index, and re-derives wall roles and door classes. Analysis
//! code consumes the finalized building immutably (endpoint snapping is the
//! one documented exception).

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::elements::{Door, DoorClass, Slab, Staircase, Wall, WallRole, Window};
use crate::geometry::{Point2D, Polygon2D};
use crate::spaces::{Apartment, RoomType, Space};
use crate::Result;

/// One floor of the building: walls, openings, slabs, staircases, spaces,
/// and apartments, plus elevation and floor-to-floor height.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    pub name: String,
    /// Absolute elevation of the story floor in meters.
    pub elevation: f64,
    /// Floor-to-floor height in meters.
    pub height: f64,
    pub walls: Vec<Wall>,
    pub doors: Vec<Door>,
    pub windows: Vec<Window>,
    pub slabs: Vec<Slab>,
    pub staircases: Vec<Staircase>,
    /// Story-level spaces not belonging to any apartment.
    pub spaces: Vec<Space>,
    pub apartments: Vec<Apartment>,
    #[serde(skip)]
    wall_index: FxHashMap<String, usize>,
}

impl Story {
    pub fn new(name: impl Into<String>, elevation: f64, height: f64) -> Self {
        Self {
            name: name.into(),
            elevation,
            height,
            walls: Vec::new(),
            doors: Vec::new(),
            windows: Vec::new(),
            slabs: Vec::new(),
            staircases: Vec::new(),
            spaces: Vec::new(),
            apartments: Vec::new(),
            wall_index: FxHashMap::default(),
        }
    }

    /// Looks up a wall by id through the finalized index, falling back to a
    /// linear scan when the index has not been built yet.
    pub fn wall(&self, id: &str) -> Option<&Wall> {
        if let Some(&i) = self.wall_index.get(id) {
            return self.walls.get(i);
        }
        self.walls.iter().find(|w| w.id == id)
    }

    pub fn wall_by_name(&self, name: &str) -> Option<&Wall> {
        self.walls.iter().find(|w| w.name == name)
    }

    pub fn door_by_name(&self, name: &str) -> Option<&Door> {
        self.doors.iter().find(|d| d.name == name)
    }

    pub fn wall_ids(&self) -> Vec<&str> {
        self.walls.iter().map(|w| w.id.as_str()).collect()
    }

    /// Walls with a given role.
    pub fn walls_with_role(&self, role: WallRole) -> Vec<&Wall> {
        self.walls.iter().filter(|w| w.role == role).collect()
    }

    /// All spaces on this story: story-level plus every apartment room.
    pub fn all_spaces(&self) -> Vec<&Space> {
        self.spaces
            .iter()
            .chain(self.apartments.iter().flat_map(|a| a.spaces.iter()))
            .collect()
    }

    /// Total floor-slab area (BGF proxy).
    pub fn floor_area(&self) -> f64 {
        self.slabs.iter().filter(|s| s.is_floor).map(|s| s.area()).sum()
    }

    /// Assigns missing tags, re-derives roles/classes, and rebuilds the
    /// wall index. Idempotent.
    fn finalize(&mut self) {
        for (i, wall) in self.walls.iter_mut().enumerate() {
            if wall.tag.is_empty() {
                wall.tag = format!("W{}", i + 1);
            }
            wall.role = WallRole::from_name(&wall.name);
        }
        for (i, door) in self.doors.iter_mut().enumerate() {
            if door.tag.is_empty() {
                door.tag = format!("D{}", i + 1);
            }
            door.class = DoorClass::from_name(&door.name);
        }
        for (i, window) in self.windows.iter_mut().enumerate() {
            if window.tag.is_empty() {
                window.tag = format!("Win{}", i + 1);
            }
        }
        for (i, st) in self.staircases.iter_mut().enumerate() {
            if st.tag.is_empty() {
                st.tag = format!("ST{}", i + 1);
            }
        }
        let mut room_counter = 0;
        for space in self.spaces.iter_mut() {
            room_counter += 1;
            if space.tag.is_empty() {
                space.tag = format!("R{room_counter}");
            }
        }
        for (i, apt) in self.apartments.iter_mut().enumerate() {
            if apt.tag.is_empty() {
                apt.tag = format!("A{}", i + 1);
            }
            for space in apt.spaces.iter_mut() {
                room_counter += 1;
                if space.tag.is_empty() {
                    space.tag = format!("R{room_counter}");
                }
            }
        }
        self.wall_index = self
            .walls
            .iter()
            .enumerate()
            .map(|(i, w)| (w.id.clone(), i))
            .collect();
    }
}

/// A building: stories kept sorted by elevation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Building {
    pub name: String,
    pub stories: Vec<Story>,
}

impl Building {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stories: Vec::new(),
        }
    }

    pub fn story(&self, name: &str) -> Option<&Story> {
        self.stories.iter().find(|s| s.name == name)
    }

    pub fn story_mut(&mut self, name: &str) -> Option<&mut Story> {
        self.stories.iter_mut().find(|s| s.name == name)
    }

    /// Adds a story. Elevation defaults to the top of the current stack.
    pub fn add_story(&mut self, name: impl Into<String>, height: f64) -> &mut Story {
        let elevation = self
            .stories
            .last()
            .map(|s| s.elevation + s.height)
            .unwrap_or(0.0);
        self.add_story_at(name, height, elevation)
    }

    pub fn add_story_at(
        &mut self,
        name: impl Into<String>,
        height: f64,
        elevation: f64,
    ) -> &mut Story {
        let name = name.into();
        self.stories.push(Story::new(name.clone(), elevation, height));
        self.stories
            .sort_by(|a, b| a.elevation.partial_cmp(&b.elevation).unwrap());
        let idx = self
            .stories
            .iter()
            .position(|s| s.name == name)
            .expect("just pushed");
        &mut self.stories[idx]
    }

    /// Adds a wall to a story, minting a sequential id (`w1`, `w2`, …).
    /// Returns the new wall's id.
    #[allow(clippy::too_many_arguments)]
    pub fn add_wall(
        &mut self,
        story: &str,
        name: &str,
        start: Point2D,
        end: Point2D,
        height: f64,
        thickness: f64,
        load_bearing: bool,
        is_external: bool,
    ) -> Result<String> {
        let s = self.require_story_mut(story);
        let id = format!("w{}", s.walls.len() + 1);
        let mut wall = Wall::new(id.clone(), name, start, end, height, thickness)?;
        wall.load_bearing = load_bearing;
        wall.is_external = is_external;
        s.walls.push(wall);
        Ok(id)
    }

    pub fn add_door(
        &mut self,
        story: &str,
        name: &str,
        wall_id: &str,
        position: f64,
        width: f64,
        height: f64,
    ) -> String {
        let s = self.require_story_mut(story);
        let id = format!("d{}", s.doors.len() + 1);
        s.doors
            .push(Door::new(id.clone(), name, wall_id, position, width, height));
        id
    }

    #[allow(clippy::too_many_arguments)]
    pub fn add_window(
        &mut self,
        story: &str,
        name: &str,
        wall_id: &str,
        position: f64,
        width: f64,
        height: f64,
        sill_height: f64,
    ) -> String {
        let s = self.require_story_mut(story);
        let id = format!("win{}", s.windows.len() + 1);
        s.windows.push(Window::new(
            id.clone(),
            name,
            wall_id,
            position,
            width,
            height,
            sill_height,
        ));
        id
    }

    pub fn add_slab(
        &mut self,
        story: &str,
        name: &str,
        outline: Polygon2D,
        thickness: f64,
        is_floor: bool,
    ) -> String {
        let s = self.require_story_mut(story);
        let id = format!("s{}", s.slabs.len() + 1);
        s.slabs.push(Slab {
            id: id.clone(),
            name: name.into(),
            outline,
            thickness,
            is_floor,
        });
        id
    }

    pub fn add_staircase(
        &mut self,
        story: &str,
        name: &str,
        outline: Polygon2D,
        width: f64,
    ) -> String {
        let s = self.require_story_mut(story);
        let id = format!("st{}", s.staircases.len() + 1);
        s.staircases.push(Staircase {
            id: id.clone(),
            name: name.into(),
            tag: String::new(),
            outline,
            width,
            riser_height: 0.175,
            tread_length: 0.28,
        });
        id
    }

    pub fn add_space(
        &mut self,
        story: &str,
        name: &str,
        room_type: RoomType,
        boundary: Polygon2D,
    ) -> String {
        let s = self.require_story_mut(story);
        let id = format!("r{}", s.spaces.len() + 1);
        s.spaces
            .push(Space::new(id.clone(), name, room_type, boundary));
        id
    }

    pub fn add_apartment(&mut self, story: &str, name: &str, boundary: Polygon2D) -> String {
        let s = self.require_story_mut(story);
        let id = format!("a{}", s.apartments.len() + 1);
        s.apartments.push(Apartment::new(id.clone(), name, boundary));
        id
    }

    /// Adds a room to an apartment, addressed by apartment id or name.
    /// Returns `None` when no such apartment exists on the story.
    pub fn add_apartment_space(
        &mut self,
        story: &str,
        apartment: &str,
        name: &str,
        room_type: RoomType,
        boundary: Polygon2D,
    ) -> Option<String> {
        let s = self.require_story_mut(story);
        let apt = s
            .apartments
            .iter_mut()
            .find(|a| a.id == apartment || a.name == apartment)?;
        let id = format!("{}r{}", apt.id, apt.spaces.len() + 1);
        apt.spaces
            .push(Space::new(id.clone(), name, room_type, boundary));
        Some(id)
    }

    /// Runs the tagging/classification pass on every story and returns the
    /// building for chaining. Must be called after the model is assembled
    /// and before analysis. Idempotent.
    pub fn finalize(&mut self) -> &mut Self {
        for story in self.stories.iter_mut() {
            story.finalize();
        }
        self
    }

    fn require_story_mut(&mut self, name: &str) -> &mut Story {
        let idx = self
            .stories
            .iter()
            .position(|s| s.name == name)
            .unwrap_or_else(|| panic!("unknown story '{name}'"));
        &mut self.stories[idx]
    }
}
