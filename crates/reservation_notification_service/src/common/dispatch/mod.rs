/*  Copyright 2022-23, Juspay India Pvt Ltd
    This program is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License
    as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version. This program
    is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY
    or FITNESS FOR A PARTICULAR PURPOSE. See the GNU Affero General Public License for more details. You should have received a copy of
    the GNU Affero General Public License along with this program. If not, see <https://www.gnu.org/licenses/>.
*/

//! Reservation dispatch: from a raw creation event to a terminal [`DispatchReport`].
//!
//! [`adapter`] validates the event, [`directory`] resolves the recipient's token,
//! [`composer`] builds the push message and [`delivery`] hands it to the push backend.
//! [`orchestrator::Dispatcher`] runs them in that order for one event.
//!
//! [`DispatchReport`]: crate::common::types::DispatchReport

pub mod adapter;
pub mod composer;
pub mod delivery;
pub mod directory;
pub mod orchestrator;

pub use delivery::{DeliveryClient, FcmDeliveryClient};
pub use directory::{RedisTokenDirectory, TokenDirectory};
pub use orchestrator::Dispatcher;
