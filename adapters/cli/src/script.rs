use std::{collections::BTreeMap, fs, path::Path};

use anyhow::{bail, Context, Result};
use glam::Vec2;

/// Pointer taps keyed by the frame they are delivered on.
///
/// Each non-empty line reads `frame x y`; text after `#` is ignored.
#[derive(Debug, Default, Clone, PartialEq)]
pub(crate) struct TapScript {
    taps: BTreeMap<u64, Vec<Vec2>>,
}

impl TapScript {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read tap script at {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid tap script at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        let mut taps: BTreeMap<u64, Vec<Vec2>> = BTreeMap::new();
        for (index, raw) in contents.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            let [frame, x, y] = fields.as_slice() else {
                bail!("line {}: expected `frame x y`, found `{line}`", index + 1);
            };
            let frame: u64 = frame
                .parse()
                .with_context(|| format!("line {}: bad frame `{frame}`", index + 1))?;
            let x: f32 = x
                .parse()
                .with_context(|| format!("line {}: bad x coordinate `{x}`", index + 1))?;
            let y: f32 = y
                .parse()
                .with_context(|| format!("line {}: bad y coordinate `{y}`", index + 1))?;
            taps.entry(frame).or_default().push(Vec2::new(x, y));
        }
        Ok(Self { taps })
    }

    /// Taps delivered on `frame`, in file order.
    pub(crate) fn taps_for(&self, frame: u64) -> &[Vec2] {
        self.taps.get(&frame).map(Vec::as_slice).unwrap_or_default()
    }
}
