/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use crate::metrics::instruments::{Gauge, IncreasingCounter};

/// Connection-level metrics aggregating all requests
#[derive(Debug, Clone, Default)]
pub struct ConnectionMetrics {
    /// Total number of requests sent, counted once they complete
    requests_sent: IncreasingCounter,
    /// Operations whose input was refused before anything was sent
    requests_refused: IncreasingCounter,
    /// Total number of requests that failed
    requests_failed: IncreasingCounter,
    /// Number of requests currently in flight
    requests_in_flight: Gauge,
    /// Object bytes sent by put operations
    bytes_uploaded: IncreasingCounter,
    /// Object bytes received by get operations
    bytes_downloaded: IncreasingCounter,
}

impl ConnectionMetrics {
    /// Create new connection metrics
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn request_started(&self) {
        self.requests_in_flight.increment(1);
    }

    pub(crate) fn request_finished(&self, success: bool) {
        self.requests_sent.increment(1);
        if !success {
            self.requests_failed.increment(1);
        }
        self.requests_in_flight.decrement(1);
    }

    /// The operation ended without sending a request
    pub(crate) fn request_refused(&self) {
        self.requests_refused.increment(1);
        self.requests_in_flight.decrement(1);
    }

    pub(crate) fn add_bytes_uploaded(&self, bytes: u64) {
        self.bytes_uploaded.increment(bytes);
    }

    pub(crate) fn add_bytes_downloaded(&self, bytes: u64) {
        self.bytes_downloaded.increment(bytes);
    }

    /// Get the number of requests sent
    pub fn requests_sent(&self) -> u64 {
        self.requests_sent.value()
    }

    /// Get the number of operations refused before a request was sent
    pub fn requests_refused(&self) -> u64 {
        self.requests_refused.value()
    }

    /// Get the number of sent requests that failed
    pub fn requests_failed(&self) -> u64 {
        self.requests_failed.value()
    }

    /// Get the number of requests currently in flight
    pub fn requests_in_flight(&self) -> u64 {
        self.requests_in_flight.value()
    }

    /// Get the total object bytes uploaded
    pub fn bytes_uploaded(&self) -> u64 {
        self.bytes_uploaded.value()
    }

    /// Get the total object bytes downloaded
    pub fn bytes_downloaded(&self) -> u64 {
        self.bytes_downloaded.value()
    }
}
