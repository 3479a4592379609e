use crate::chart::{ChartSurface, SeriesHandle, SeriesStyle, VisualKind};
use crate::config::PLOT_CONFIG;
use crate::series::SyncError;
use crate::series::legend::LegendEntry;

/// Creates one chart series plus its legend element.
pub struct SeriesFactory;

impl SeriesFactory {
    /// Adds a series of `kind` to the surface with kind-appropriate scale margins.
    /// A non-zero `pane` moves it off the main pane.
    ///
    /// On error nothing was added to the surface.
    pub fn create<S: ChartSurface + ?Sized>(
        surface: &mut S,
        instance_key: &str,
        idle_label: &str,
        kind: VisualKind,
        style: &SeriesStyle,
        pane: Option<usize>,
    ) -> Result<(SeriesHandle, LegendEntry), SyncError> {
        let handle = surface.create_series(kind, style).map_err(SyncError::from)?;

        let margins = match kind {
            VisualKind::Histogram => PLOT_CONFIG.volume_scale_margins,
            VisualKind::Line | VisualKind::PriceBar => PLOT_CONFIG.price_scale_margins,
        };
        surface.set_scale_margins(handle, margins);

        if let Some(pane) = pane.filter(|&p| p != 0) {
            surface.move_to_pane(handle, pane);
        }

        let legend_color = match kind {
            VisualKind::PriceBar => style.up_color,
            VisualKind::Line | VisualKind::Histogram => style.color,
        };
        Ok((handle, LegendEntry::new(instance_key, idle_label, legend_color)))
    }
}
