// ── Details-access permission rule ──

use crate::model::{AlarmRecord, Authority, CurrentUser};

/// Whether `user` may acknowledge or clear `record`.
///
/// Customer users are limited to their own customer's alarms; every other
/// authority is unrestricted. Does not affect what a fetch returns.
pub fn can_modify_alarm(user: &CurrentUser, record: &AlarmRecord) -> bool {
    user.authority != Authority::CustomerUser || record.customer_id == user.customer_id
}
