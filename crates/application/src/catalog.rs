use scopecap_domain::ProjectRecord;

pub fn find_by_name<'a>(records: &'a [ProjectRecord], name: &str) -> Option<&'a ProjectRecord> {
    records.iter().find(|record| record.name == name)
}

pub(crate) fn find_by_name_mut<'a>(
    records: &'a mut [ProjectRecord],
    name: &str,
) -> Option<&'a mut ProjectRecord> {
    records.iter_mut().find(|record| record.name == name)
}
