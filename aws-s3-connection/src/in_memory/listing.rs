/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::collections::BTreeMap;
use std::ops::Bound;

use super::StoredObject;
use crate::types::ObjectSummary;

/// One page of entries selected from a bucket
#[derive(Debug, Default)]
pub(super) struct Page {
    pub(super) objects: Vec<ObjectSummary>,
    pub(super) common_prefixes: Vec<String>,
    pub(super) is_truncated: bool,
    pub(super) next_marker: Option<String>,
}

/// Select the entries of a page the way a `ListObjects` request does.
///
/// Keys are visited in ascending byte order, restricted to `prefix` and strictly after
/// `marker`. With a delimiter, keys sharing a common prefix collapse into a single entry.
/// Objects and common prefixes both count toward `max_keys`.
pub(super) fn list_page(
    objects: &BTreeMap<String, StoredObject>,
    prefix: &str,
    marker: Option<&str>,
    delimiter: Option<&str>,
    max_keys: usize,
) -> Page {
    let start = match marker {
        Some(marker) if marker >= prefix => Bound::Excluded(marker),
        _ => Bound::Included(prefix),
    };
    let candidates = objects
        .range::<str, _>((start, Bound::Unbounded))
        .take_while(|(key, _)| key.starts_with(prefix));

    let mut page = Page::default();
    let mut last_emitted: Option<&str> = None;
    let mut count = 0;

    for (key, object) in candidates {
        let common_prefix = delimiter.and_then(|delimiter| {
            let rest = &key[prefix.len()..];
            rest.find(delimiter)
                .map(|idx| &key[..prefix.len() + idx + delimiter.len()])
        });

        if let Some(common_prefix) = common_prefix {
            // already returned on a previous page, or already on this one
            if marker.is_some_and(|marker| common_prefix <= marker)
                || page.common_prefixes.last().map(String::as_str) == Some(common_prefix)
            {
                continue;
            }
            if count == max_keys {
                page.is_truncated = true;
                break;
            }
            page.common_prefixes.push(common_prefix.to_owned());
            last_emitted = Some(common_prefix);
        } else {
            if count == max_keys {
                page.is_truncated = true;
                break;
            }
            page.objects.push(object.summary(key));
            last_emitted = Some(key);
        }
        count += 1;
    }

    if page.is_truncated {
        page.next_marker = last_emitted.map(str::to_owned);
    }
    page
}
