use eframe::egui::Color32;

use crate::series::registry::IndicatorGroup;

/// The legend element of one series instance.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub instance_key: String,
    /// Shown when the crosshair has no value for this series
    pub idle_label: String,
    pub color: Color32,
    pub text: String,
}

impl LegendEntry {
    pub fn new(instance_key: &str, idle_label: &str, color: Color32) -> Self {
        Self {
            instance_key: instance_key.to_string(),
            idle_label: idle_label.to_string(),
            color,
            text: idle_label.to_string(),
        }
    }

    /// Legend text for a formatted value, or the idle label when there is none.
    pub fn text_for(&self, value_text: Option<&str>) -> String {
        match value_text {
            Some(value_text) => format!("{} {}", self.idle_label, value_text),
            None => self.idle_label.clone(),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.text == self.idle_label
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LegendBlock {
    /// A standalone legend row
    Individual(String),
    /// One container shared by every member of an indicator group
    Group {
        group: IndicatorGroup,
        symbol: &'static str,
        members: Vec<String>,
    },
}

/// Legend arrangement, blocks in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegendLayout {
    pub blocks: Vec<LegendBlock>,
}

impl LegendLayout {
    pub fn build<'a>(instances: impl IntoIterator<Item = (&'a str, Option<IndicatorGroup>)>) -> Self {
        let mut blocks: Vec<LegendBlock> = Vec::new();
        for (key, group) in instances {
            let Some(group) = group else {
                blocks.push(LegendBlock::Individual(key.to_string()));
                continue;
            };

            let existing = blocks.iter_mut().find_map(|block| match block {
                LegendBlock::Group { group: g, members, .. } if *g == group => Some(members),
                _ => None,
            });
            match existing {
                Some(members) => members.push(key.to_string()),
                None => blocks.push(LegendBlock::Group {
                    group,
                    symbol: group.symbol(),
                    members: vec![key.to_string()],
                }),
            }
        }
        Self { blocks }
    }

    pub fn group_count(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| matches!(b, LegendBlock::Group { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_collect_their_members() {
        let layout = LegendLayout::build(vec![
            ("__price__", None),
            ("bb_upper_20", Some(IndicatorGroup::Bollinger)),
            ("volume", None),
            ("bb_lower_20", Some(IndicatorGroup::Bollinger)),
        ]);

        assert_eq!(layout.blocks.len(), 3);
        assert_eq!(layout.group_count(), 1);
        assert_eq!(
            layout.blocks[1],
            LegendBlock::Group {
                group: IndicatorGroup::Bollinger,
                symbol: "BB",
                members: vec!["bb_upper_20".to_string(), "bb_lower_20".to_string()],
            }
        );
    }

    #[test]
    fn entry_switches_between_value_and_idle() {
        let mut entry = LegendEntry::new("rsi", "RSI", Color32::WHITE);
        assert!(entry.is_idle());
        entry.text = entry.text_for(Some("55.00"));
        assert_eq!(entry.text, "RSI 55.00");
        assert!(!entry.is_idle());
        entry.text = entry.text_for(None);
        assert!(entry.is_idle());
    }
}
