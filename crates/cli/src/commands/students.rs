use anyhow::{Result, bail};
use student_records_client::{StudentClient, StudentForm};
use student_records_core::{NewStudent, SearchRequest, SortField, SortOrder};

pub(crate) async fn run_list(
    url: &str,
    search: Option<String>,
    sort_by: SortField,
    order: &str,
    limit: Option<usize>,
    offset: Option<usize>,
) -> Result<()> {
    let client = StudentClient::new(url)?;
    let request = SearchRequest {
        search_term: search,
        sort_by,
        sort_order: SortOrder::from_lenient(Some(order)),
        limit,
        offset,
    };
    let students = client.list_students(&request).await?;
    println!("{}", serde_json::to_string_pretty(&students)?);
    Ok(())
}

pub(crate) async fn run_get(url: &str, id: &str) -> Result<()> {
    let client = StudentClient::new(url)?;
    match client.get_student(id).await? {
        Some(student) => println!("{}", serde_json::to_string_pretty(&student)?),
        None => println!("Student not found: {id}"),
    }
    Ok(())
}

pub(crate) async fn run_create(
    url: &str,
    name: String,
    email: String,
    age: String,
    address: String,
) -> Result<()> {
    let form = StudentForm { name, email, age, address };
    let input = match form.validate() {
        Ok(input) => input,
        Err(errors) => {
            let details: Vec<String> =
                errors.iter().map(|(field, msg)| format!("{field}: {msg}")).collect();
            bail!("invalid student: {}", details.join("; "));
        },
    };
    let client = StudentClient::new(url)?;
    let student = client.create_student(&input).await?;
    println!("{}", serde_json::to_string_pretty(&student)?);
    Ok(())
}

pub(crate) async fn run_update(
    url: &str,
    id: &str,
    name: Option<String>,
    email: Option<String>,
    age: Option<i32>,
    address: Option<String>,
) -> Result<()> {
    let input = NewStudent { name, email, age, address };
    if input == NewStudent::default() {
        bail!("nothing to update: pass at least one of --name, --email, --age, --address");
    }
    let client = StudentClient::new(url)?;
    let student = match client.update_student(id, &input).await {
        Ok(student) => student,
        Err(e) if e.is_not_found() => bail!("Student not found: {id}"),
        Err(e) => return Err(e.into()),
    };
    println!("{}", serde_json::to_string_pretty(&student)?);
    Ok(())
}

pub(crate) async fn run_delete(url: &str, id: &str) -> Result<()> {
    let client = StudentClient::new(url)?;
    match client.delete_student(id).await {
        Ok(message) => println!("{message}"),
        Err(e) if e.is_not_found() => bail!("Student not found: {id}"),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}
