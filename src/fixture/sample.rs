//! Trimmed-down fixture in the layout the email parser's testspec uses.

/// One single-address case, one multiple-address case with two records, and
/// one case without a result. Three records, none with `comments`.
pub const FIXTURE: &str = "-
    emails: 'john@example.com'
    multiple: false
    result:
        address: john@example.com
        simple_address: john@example.com
        original_address: john@example.com
        name: ''
        local_part: john
        domain: example.com
        ip: ''
        invalid: false
        invalid_reason: null
-
    emails: 'a@b.com, bad@@c.com'
    multiple: true
    result:
        success: false
        reason: 'Invalid email address'
        email_addresses:
            -
                address: a@b.com
                invalid: false
                invalid_reason: null
            -
                address: 'bad@@c.com'
                invalid: true
                invalid_reason: \"Multiple at '@' symbols in email address\"
-
    emails: ''
    multiple: false
";
