/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

mod stream;

// re-exports
pub use self::stream::InputStream;
pub use self::stream::SeekableRead;
