//! Allow-list of documented Converge request/response fields.
//!
//! Independent of the mapping dictionary: a standard field missing from the
//! dictionary is a dictionary gap, anything else is a merchant custom field.

const STANDARD_FIELDS: &[&str] = &[
    "ssl_account_id",
    "ssl_add_token",
    "ssl_address2",
    "ssl_amount",
    "ssl_approval_code",
    "ssl_avs_address",
    "ssl_avs_response",
    "ssl_avs_zip",
    "ssl_card_number",
    "ssl_card_present",
    "ssl_card_short_description",
    "ssl_card_type",
    "ssl_city",
    "ssl_company",
    "ssl_country",
    "ssl_customer_code",
    "ssl_cvv2_response",
    "ssl_cvv2cvc2",
    "ssl_cvv2cvc2_indicator",
    "ssl_description",
    "ssl_device_id",
    "ssl_email",
    "ssl_error_url",
    "ssl_exp_date",
    "ssl_first_name",
    "ssl_get_token",
    "ssl_invoice_number",
    "ssl_last_name",
    "ssl_merchant_id",
    "ssl_phone",
    "ssl_pin",
    "ssl_receipt_link_url",
    "ssl_result",
    "ssl_result_format",
    "ssl_result_message",
    "ssl_salestax",
    "ssl_search_end_date",
    "ssl_search_start_date",
    "ssl_show_form",
    "ssl_state",
    "ssl_test_mode",
    "ssl_token",
    "ssl_transaction_currency",
    "ssl_transaction_type",
    "ssl_txn_auth_token",
    "ssl_txn_id",
    "ssl_txn_time",
    "ssl_user_id",
    "ssl_vendor_id",
];

/// Families of standard fields with open-ended suffixes.
const STANDARD_STEMS: &[&str] = &["ssl_ship_to_", "ssl_recurring_", "ssl_3dsecure_", "ssl_dynamic_dba"];

/// True for documented Converge fields (case-insensitive).
pub fn is_standard_field(field: &str) -> bool {
    let lower = field.to_ascii_lowercase();
    STANDARD_FIELDS.binary_search(&lower.as_str()).is_ok()
        || STANDARD_STEMS.iter().any(|stem| lower.starts_with(stem))
}
