// ============================================================================
// videoconverter-core/src/processing/filters.rs
// ============================================================================
//
// FILTER PLANNER: Video Filter-Graph Decisions
//
// Decides which video filters a file needs: deinterlacing (from the stream's
// field order or policy), a verbatim crop expression, and an upscale target.
// The plan is data only; the command builder renders it into a filter chain.

// ---- Internal crate imports ----
use crate::config::{EncodePolicy, UPSCALE_TARGET_HEIGHT};
use crate::media::Track;

/// Deinterlace filter used when the plan asks for it.
pub const DEINTERLACE_FILTER: &str = "yadif";

/// Video filters to apply to one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPlan {
    pub deinterlace: bool,
    pub crop_expr: Option<String>,
    /// Scale target as (width, height).
    pub upscale_target: Option<(u32, u32)>,
}

impl FilterPlan {
    /// Whether any filter is active. Filters need decoded frames, so an
    /// active plan rules out stream copy.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.deinterlace || self.crop_expr.is_some() || self.upscale_target.is_some()
    }

    /// Filters in application order: crop, deinterlace, upscale.
    #[must_use]
    pub fn filters(&self) -> Vec<String> {
        let mut filters = Vec::new();
        if let Some(crop) = &self.crop_expr {
            filters.push(crop.clone());
        }
        if self.deinterlace {
            filters.push(DEINTERLACE_FILTER.to_string());
        }
        if let Some((width, height)) = self.upscale_target {
            filters.push(format!("scale={width}:{height}"));
        }
        filters
    }
}

/// Plans the filters for the selected video track.
#[must_use]
pub fn plan_filters(video: &Track, policy: &EncodePolicy) -> FilterPlan {
    let interlaced = video
        .field_order
        .as_deref()
        .is_some_and(|order| !order.contains("progressive"));
    let deinterlace = !policy.no_deinterlace && (interlaced || policy.force_deinterlace);

    let crop_expr = policy.crop_filter().map(str::to_string);

    let upscale_target = if policy.upscale {
        let source = crop_expr
            .as_deref()
            .and_then(crop_dimensions)
            .or_else(|| video.width.zip(video.height));
        match source {
            Some((width, height)) if height > 0 && height < UPSCALE_TARGET_HEIGHT => Some((
                upscale_width(width, height, UPSCALE_TARGET_HEIGHT),
                UPSCALE_TARGET_HEIGHT,
            )),
            Some(_) => None,
            None => {
                log::warn!(
                    "Stream {} has no dimensions; skipping upscale",
                    video.index
                );
                None
            }
        }
    } else {
        None
    };

    let plan = FilterPlan {
        deinterlace,
        crop_expr,
        upscale_target,
    };
    log::debug!("Filter plan for stream {}: {:?}", video.index, plan);
    plan
}

/// Width that keeps the aspect ratio of `width`x`height` at `target_height`,
/// rounded up to the next even number and never below 2.
#[must_use]
pub fn upscale_width(width: u32, height: u32, target_height: u32) -> u32 {
    if height == 0 {
        return 2;
    }
    let scaled = (u64::from(width) * u64::from(target_height)).div_ceil(u64::from(height));
    let even = scaled + (scaled % 2);
    u32::try_from(even.max(2)).unwrap_or(u32::MAX - 1)
}

/// Output dimensions of a `crop=W:H[:X:Y]` expression, when they are plain
/// integers. Expressions using ffmpeg variables (`in_w-100`, ...) yield `None`.
#[must_use]
pub fn crop_dimensions(expr: &str) -> Option<(u32, u32)> {
    let params = expr.trim().strip_prefix("crop=")?;
    let mut parts = params.split(':');
    let width = parts.next()?.trim().parse().ok()?;
    let height = parts.next()?.trim().parse().ok()?;
    Some((width, height))
}
