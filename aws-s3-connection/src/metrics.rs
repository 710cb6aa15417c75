/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

/// Metrics aggregators
pub mod aggregators;
/// Instruments for measuring metrics
pub mod instruments;
