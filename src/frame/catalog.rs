use std::collections::HashMap;

use itertools::Itertools;

use crate::{
    error::Error,
    frame::{FrameId, ReferenceFrame},
};

/// Lowercase alphanumerical representation of a frame label.
fn normalize_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Frame [Catalog]: immutable description of every supported realization,
/// and resolution of user friendly labels.
#[derive(Debug, Clone)]
pub struct Catalog {
    frames: Vec<ReferenceFrame>,
    aliases: HashMap<String, FrameId>,
}

impl Default for Catalog {
    fn default() -> Self {
        let frames = FrameId::ALL
            .iter()
            .map(|id| ReferenceFrame::from(*id))
            .collect::<Vec<_>>();

        let mut aliases = HashMap::<String, FrameId>::with_capacity(4 * frames.len());

        // full labels always win, short forms are registered
        // by the first frame that claims them
        for frame in frames.iter() {
            aliases.insert(normalize_label(frame.label), frame.id);
        }

        for frame in frames.iter() {
            if let Some(first) = frame.label.split_whitespace().next() {
                aliases.entry(normalize_label(first)).or_insert(frame.id);
            }
            if let Some((before, _)) = frame.label.split_once('(') {
                aliases.entry(normalize_label(before)).or_insert(frame.id);
            }
            for alias in frame.id.extra_aliases() {
                aliases.entry(normalize_label(alias)).or_insert(frame.id);
            }
        }

        aliases.remove("");

        Self { frames, aliases }
    }
}

impl Catalog {
    /// Returns (menu index, display label) of every frame, sorted by index.
    pub fn list_frames(&self) -> Vec<(u8, &'static str)> {
        self.frames
            .iter()
            .map(|frame| (frame.index, frame.label))
            .sorted_by_key(|(index, _)| *index)
            .collect()
    }

    /// Iterates over every [ReferenceFrame].
    pub fn frames(&self) -> impl Iterator<Item = &ReferenceFrame> {
        self.frames.iter()
    }

    /// Returns [ReferenceFrame] description.
    pub fn frame(&self, id: FrameId) -> &ReferenceFrame {
        // frames are stored in menu order
        &self.frames[id.index() as usize - 1]
    }

    /// Resolves a frame from its menu index ("25"),
    /// its label ("ITRF2014 or IGS14/IGb14") or one of its aliases ("igs14").
    pub fn resolve(&self, value: &str) -> Result<FrameId, Error> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(Error::UnknownFrame(value.to_string()));
        }

        if trimmed.chars().all(|c| c.is_ascii_digit()) {
            let index = trimmed
                .parse::<u8>()
                .map_err(|_| Error::UnknownFrame(value.to_string()))?;
            return FrameId::from_index(index);
        }

        self.aliases
            .get(&normalize_label(trimmed))
            .copied()
            .ok_or_else(|| Error::UnknownFrame(value.to_string()))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn listing() {
        let catalog = Catalog::default();
        let frames = catalog.list_frames();
        assert_eq!(frames.len(), 26);
        assert_eq!(frames[0], (1, "NAD_83(2011/CORS96/2007)"));
        assert_eq!(frames[25], (26, "ITRF2020 or IGS20/IGb20"));
    }

    #[test]
    fn resolution() {
        let catalog = Catalog::default();
        for (value, expected) in [
            ("1", FrameId::Nad83_2011),
            (" 25 ", FrameId::Itrf2014),
            ("ITRF2014 or IGS14/IGb14", FrameId::Itrf2014),
            ("itrf2014", FrameId::Itrf2014),
            ("IGb14", FrameId::Itrf2014),
            ("NAD_83", FrameId::Nad83_2011),
            ("nad83(2011)", FrameId::Nad83_2011),
            ("NAD 83 (PA11)", FrameId::Nad83Pa11),
            ("WGS84", FrameId::Wgs84Transit),
            ("WGS84(G1762)", FrameId::Wgs84G1762),
            ("wgs-84 (g2296)", FrameId::Wgs84G2296),
            ("ITRF2000", FrameId::Itrf2000),
            ("itrf96", FrameId::Itrf96),
        ] {
            assert_eq!(catalog.resolve(value), Ok(expected), "failed for {}", value);
        }
    }

    #[test]
    fn unknown_frames() {
        let catalog = Catalog::default();
        for value in ["", "  ", "0", "27", "300", "ETRF2000", "nad27"] {
            assert!(
                matches!(catalog.resolve(value), Err(Error::UnknownFrame(_))),
                "{} should not resolve",
                value
            );
        }
    }
}
