/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use tracing::Instrument;

use crate::client::Handle;
use crate::error::{self, ErrorKind};
use crate::types::{Bucket, Owner, ResponseMetadata, S3Response};

/// Response listing every bucket owned by the caller
#[derive(Debug, Clone)]
pub struct ListAllBucketsResponse {
    pub(crate) buckets: Vec<Bucket>,
    pub(crate) owner: Option<Owner>,
    pub(crate) metadata: ResponseMetadata,
}

impl ListAllBucketsResponse {
    /// The buckets, in the order the service returned them
    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    /// Owner of the buckets
    pub fn owner(&self) -> Option<&Owner> {
        self.owner.as_ref()
    }

    /// Canonical user ID of the owner
    pub fn owner_id(&self) -> Option<&str> {
        self.owner.as_ref().and_then(Owner::id)
    }

    /// Display name of the owner
    pub fn owner_display_name(&self) -> Option<&str> {
        self.owner.as_ref().and_then(Owner::display_name)
    }

    /// Consume the response, returning the buckets
    pub fn into_buckets(self) -> Vec<Bucket> {
        self.buckets
    }
}

impl S3Response for ListAllBucketsResponse {
    fn response_metadata(&self) -> &ResponseMetadata {
        &self.metadata
    }
}

/// Operation struct for listing all buckets
#[derive(Clone, Default, Debug)]
pub(crate) struct ListAllBuckets;

impl ListAllBuckets {
    pub(crate) async fn orchestrate(handle: &Handle) -> Result<ListAllBucketsResponse, error::Error> {
        let output = handle
            .client()
            .list_buckets()
            .send()
            .instrument(tracing::debug_span!("send-list-buckets"))
            .await
            .map_err(error::from_sdk(ErrorKind::ListFailed))?;

        let buckets = output
            .buckets()
            .iter()
            .filter_map(|b| {
                Some(Bucket {
                    name: b.name()?.to_owned(),
                    creation_date: b.creation_date().cloned(),
                })
            })
            .collect::<Vec<_>>();
        tracing::trace!("listed {} buckets", buckets.len());

        let owner = output.owner().map(|o| Owner {
            id: o.id().map(str::to_owned),
            display_name: o.display_name().map(str::to_owned),
        });

        Ok(ListAllBucketsResponse {
            buckets,
            owner,
            metadata: ResponseMetadata::from_output(&output),
        })
    }
}
