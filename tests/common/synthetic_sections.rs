use staff_filaments::{Orientation, Run, Section, SectionId};
use std::sync::Arc;

/// Horizontal section covering `[first, last]` whose run at `x` is given by
/// `run_at(x)`.
pub fn horizontal_section<F>(id: u32, first: i32, last: i32, run_at: F) -> Arc<Section>
where
    F: Fn(i32) -> Run,
{
    assert!(last >= first, "section span must not be empty");
    let runs = (first..=last).map(run_at).collect();
    Arc::new(Section::new(SectionId(id), Orientation::Horizontal, first, runs))
}

/// Straight horizontal stroke centered on `y` with the given thickness.
pub fn straight_stroke(id: u32, first: i32, last: i32, y: f64, thickness: u32) -> Arc<Section> {
    let start = (y - thickness as f64 / 2.0).round() as i32;
    horizontal_section(id, first, last, |_| Run::new(start, thickness))
}

/// Cuts `[first, last]` into `pieces` contiguous straight strokes.
pub fn split_stroke(
    first_id: u32,
    first: i32,
    last: i32,
    pieces: usize,
    y: f64,
    thickness: u32,
) -> Vec<Arc<Section>> {
    assert!(pieces > 0);
    let span = (last - first + 1) as usize;
    let step = span.div_ceil(pieces) as i32;
    let mut sections = Vec::with_capacity(pieces);
    let mut start = first;
    let mut id = first_id;
    while start <= last {
        let stop = (start + step - 1).min(last);
        sections.push(straight_stroke(id, start, stop, y, thickness));
        start = stop + 1;
        id += 1;
    }
    sections
}
