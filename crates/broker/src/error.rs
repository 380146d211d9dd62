// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

#[derive(Debug, thiserror::Error)]
pub enum BrokerError {
    #[error("subscriber channel closed")]
    SubscriberGone,
}
