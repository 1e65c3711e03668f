//! Image reference deduplication and logo flagging.

use std::collections::{BTreeSet, HashMap};

use crate::model::{ImageInfo, RawPage, LOGO_REPEAT_RATIO, SMALL_AREA_THRESHOLD};
use crate::options::ImageDedup;

/// Counters from the image pass, merged into the run statistics.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct ImageCounters {
    pub total: u64,
    pub unique: u64,
    pub logos: u64,
}

/// Deduplicate embedded image references across the document.
///
/// Xref mode keeps one record per object reference with the full list of
/// pages it appears on; page mode keeps one record per page occurrence.
/// Logo detection only applies in xref mode since it needs the page list.
pub(crate) fn dedup_images(pages: &[RawPage], mode: ImageDedup) -> (Vec<ImageInfo>, ImageCounters) {
    let mut counters = ImageCounters::default();
    let images = match mode {
        ImageDedup::Xref => dedup_by_xref(pages, &mut counters),
        ImageDedup::Page => dedup_by_page(pages, &mut counters),
    };
    counters.unique = images.len() as u64;
    log::debug!(
        "image pass: {} references, {} unique, {} logos",
        counters.total,
        counters.unique,
        counters.logos
    );
    (images, counters)
}

fn dedup_by_xref(pages: &[RawPage], counters: &mut ImageCounters) -> Vec<ImageInfo> {
    // First-occurrence order; the page set collects every later sighting.
    let mut order: Vec<u64> = Vec::new();
    let mut seen: HashMap<u64, (ImageInfo, BTreeSet<u32>)> = HashMap::new();

    for (idx, page) in pages.iter().enumerate() {
        let page_no = idx as u32 + 1;
        for img in &page.images {
            counters.total += 1;
            let entry = seen.entry(img.xref).or_insert_with(|| {
                order.push(img.xref);
                let info = ImageInfo {
                    xref: img.xref,
                    width: img.width,
                    height: img.height,
                    bpc: img.bpc,
                    colorspace: img.colorspace.clone(),
                    page: page_no,
                    pages: Vec::new(),
                    is_repeated_logo: false,
                };
                (info, BTreeSet::new())
            });
            entry.1.insert(page_no);
        }
    }

    let page_count = pages.len() as u32;
    order
        .into_iter()
        .filter_map(|xref| seen.remove(&xref))
        .map(|(mut info, page_set)| {
            info.pages = page_set.into_iter().collect();
            info.is_repeated_logo = info.page_repeat_ratio(page_count) >= LOGO_REPEAT_RATIO
                && info.area() < SMALL_AREA_THRESHOLD;
            if info.is_repeated_logo {
                counters.logos += 1;
            }
            info
        })
        .collect()
}

fn dedup_by_page(pages: &[RawPage], counters: &mut ImageCounters) -> Vec<ImageInfo> {
    let mut seen: BTreeSet<(u32, u64)> = BTreeSet::new();
    let mut images = Vec::new();

    for (idx, page) in pages.iter().enumerate() {
        let page_no = idx as u32 + 1;
        for img in &page.images {
            counters.total += 1;
            if !seen.insert((page_no, img.xref)) {
                continue;
            }
            images.push(ImageInfo {
                xref: img.xref,
                width: img.width,
                height: img.height,
                bpc: img.bpc,
                colorspace: img.colorspace.clone(),
                page: page_no,
                pages: vec![page_no],
                is_repeated_logo: false,
            });
        }
    }
    images
}
