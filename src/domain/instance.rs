use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Shape, Zone};

/// An item type to be cut, with its demand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "Demand")]
    pub demand: u32,
    #[serde(rename = "DemandMax")]
    pub demand_max: u32,
    #[serde(rename = "Value", default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
    /// Minimum quality the item requires, if the whole part is graded
    #[serde(rename = "Quality", default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u32>,
    /// Rotations in degrees the item may be placed at; unrestricted when absent
    #[serde(rename = "AllowedOrientations", default, skip_serializing_if = "Option::is_none")]
    pub allowed_orientations: Option<Vec<f64>>,
    #[serde(rename = "Zones", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub zones: BTreeMap<String, Zone>,
    /// Relative path of the outline drawing, set when the instance is written
    #[serde(rename = "Shape", default, skip_serializing_if = "Option::is_none")]
    pub dxf_path: Option<String>,
    #[serde(rename = "Geometry")]
    pub shape: Shape,
}

impl Item {
    pub fn new(demand: u32, shape: Shape) -> Self {
        Self {
            demand,
            demand_max: demand,
            value: None,
            quality: None,
            allowed_orientations: None,
            zones: BTreeMap::new(),
            dxf_path: None,
            shape,
        }
    }
}

/// Open-ended strip of fixed height, used instead of bins by strip packing
/// instances
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Strip {
    #[serde(rename = "Height")]
    pub height: f64,
}

/// A stock object (bin) items are cut from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    #[serde(rename = "Cost")]
    pub cost: f64,
    #[serde(rename = "Stock")]
    pub stock: u32,
    #[serde(rename = "Quality", default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<u32>,
    #[serde(rename = "Zones", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub zones: BTreeMap<String, Zone>,
    #[serde(rename = "Shape", default, skip_serializing_if = "Option::is_none")]
    pub dxf_path: Option<String>,
    #[serde(rename = "Geometry")]
    pub shape: Shape,
}

impl Bin {
    pub fn new(shape: Shape) -> Self {
        Self {
            cost: 1.0,
            stock: 1,
            quality: None,
            zones: BTreeMap::new(),
            dxf_path: None,
            shape,
        }
    }
}

/// A complete converted benchmark instance
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Instance {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Items")]
    pub items: Vec<Item>,
    #[serde(rename = "Objects", default)]
    pub bins: Vec<Bin>,
    #[serde(rename = "Strip", default, skip_serializing_if = "Option::is_none")]
    pub strip: Option<Strip>,
}

impl Instance {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            items: Vec::new(),
            bins: Vec::new(),
            strip: None,
        }
    }

    /// Add an item, merging it into an existing item with an identical shape
    ///
    /// Returns `true` if the item was merged. Shapes must already be cleaned,
    /// otherwise digitization noise keeps duplicates apart.
    pub fn add_item(&mut self, item: Item) -> bool {
        if let Some(existing) = self.items.iter_mut().find(|i| i.shape == item.shape) {
            existing.demand += item.demand;
            existing.demand_max += item.demand_max;
            true
        } else {
            self.items.push(item);
            false
        }
    }

    pub fn total_demand(&self) -> u32 {
        self.items.iter().map(|i| i.demand).sum()
    }

    /// Assign outline drawing paths (`<dir>/i_<k>.dxf`, `<dir>/o_<k>.dxf`)
    pub fn set_dxf_paths(&mut self, dir_name: &str) {
        for (i, item) in self.items.iter_mut().enumerate() {
            item.dxf_path = Some(format!("{}/i_{}.dxf", dir_name, i));
        }
        for (i, bin) in self.bins.iter_mut().enumerate() {
            bin.dxf_path = Some(format!("{}/o_{}.dxf", dir_name, i));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Point, Ring};

    fn square(size: f64) -> Shape {
        Shape::new(Ring::new(vec![
            Point::new(0.0, 0.0),
            Point::new(size, 0.0),
            Point::new(size, size),
            Point::new(0.0, size),
        ]))
    }

    #[test]
    fn test_identical_shapes_merge_demand() {
        let mut instance = Instance::new("test");
        assert!(!instance.add_item(Item::new(2, square(10.0))));
        assert!(instance.add_item(Item::new(3, square(10.0))));

        assert_eq!(instance.items.len(), 1);
        assert_eq!(instance.items[0].demand, 5);
        assert_eq!(instance.items[0].demand_max, 5);
        assert_eq!(instance.total_demand(), 5);
    }

    #[test]
    fn test_different_shapes_do_not_merge() {
        let mut instance = Instance::new("test");
        instance.add_item(Item::new(2, square(10.0)));
        instance.add_item(Item::new(3, square(12.0)));

        assert_eq!(instance.items.len(), 2);
        assert_eq!(instance.total_demand(), 5);
    }

    #[test]
    fn test_set_dxf_paths() {
        let mut instance = Instance::new("test");
        instance.add_item(Item::new(1, square(1.0)));
        instance.add_item(Item::new(1, square(2.0)));
        instance.bins.push(Bin::new(square(100.0)));

        instance.set_dxf_paths("dxf");

        assert_eq!(instance.items[1].dxf_path.as_deref(), Some("dxf/i_1.dxf"));
        assert_eq!(instance.bins[0].dxf_path.as_deref(), Some("dxf/o_0.dxf"));
    }

    #[test]
    fn test_instance_json_keys() {
        let mut instance = Instance::new("demo");
        instance.add_item(Item::new(4, square(1.0)));
        instance.bins.push(Bin::new(square(10.0)));

        let value = serde_json::to_value(&instance).unwrap();
        assert_eq!(value["Name"], "demo");
        assert_eq!(value["Items"][0]["Demand"], 4);
        assert_eq!(value["Objects"][0]["Stock"], 1);
        assert!(value["Items"][0].get("Value").is_none());
        assert_eq!(value["Items"][0]["Geometry"]["Outer"][1][0], 1.0);
        assert!(value.get("Strip").is_none());
    }

    #[test]
    fn test_strip_instance_json() {
        let mut instance = Instance::new("albano");
        let mut item = Item::new(2, square(1.0));
        item.allowed_orientations = Some(vec![0.0, 180.0]);
        instance.add_item(item);
        instance.strip = Some(Strip { height: 4900.0 });

        let value = serde_json::to_value(&instance).unwrap();
        assert_eq!(value["Strip"]["Height"], 4900.0);
        assert_eq!(value["Items"][0]["AllowedOrientations"][1], 180.0);
        assert_eq!(value["Objects"].as_array().map(|b| b.len()), Some(0));
    }
}
