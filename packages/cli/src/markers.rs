//! Map marker presentation.
//!
//! The presenter owns no dashboard state. Whatever should happen when a
//! marker is picked is passed in as the `on_select` callback.

use crime_stats_geography_models::GeoPoint;
use dialoguer::Select;

use crate::render;

/// Lists map markers and lets the user pick them one at a time.
pub struct MarkerPresenter {
    prompt: String,
}

impl MarkerPresenter {
    #[must_use]
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }

    /// Prints the markers, then repeatedly asks for one and hands it to
    /// `on_select` until the user chooses to go back.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails.
    pub fn present<F>(&self, points: &[GeoPoint], mut on_select: F) -> Result<(), dialoguer::Error>
    where
        F: FnMut(&GeoPoint),
    {
        print!("{}", render::format_markers(points));
        if points.is_empty() {
            return Ok(());
        }

        let mut labels = marker_labels(points);
        labels.push("<- Back".to_string());

        loop {
            let idx = Select::new()
                .with_prompt(&self.prompt)
                .items(&labels)
                .default(0)
                .max_length(15)
                .interact()?;

            let Some(point) = points.get(idx) else {
                return Ok(());
            };
            on_select(point);
        }
    }
}

fn marker_labels(points: &[GeoPoint]) -> Vec<String> {
    points
        .iter()
        .map(|p| {
            format!(
                "{} [{}] {}",
                p.location_id,
                p.intensity_tier,
                crime_stats_dataset_models::format_number(p.total_count)
            )
        })
        .collect()
}
