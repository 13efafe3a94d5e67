//! The web form served at `GET /`. Plain HTML plus a little fetch() glue;
//! everything real happens in the JSON API.

pub const INDEX_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Tubescript</title>
<style>
  body { font-family: sans-serif; max-width: 48rem; margin: 2rem auto; padding: 0 1rem; }
  label { display: block; margin-top: 0.8rem; }
  input[type=text], select { width: 100%; padding: 0.4rem; }
  button { margin-top: 1rem; padding: 0.5rem 1.2rem; }
  #result { white-space: pre-wrap; border: 1px solid #ccc; padding: 1rem; margin-top: 1.5rem; display: none; }
  #error { color: #b00; margin-top: 1rem; }
</style>
</head>
<body>
<h1>YouTube Transcript Generator</h1>
<p>Generate and download readable transcripts for YouTube videos.</p>

<form id="form">
  <label>YouTube Video URL
    <input type="text" id="url" placeholder="https://www.youtube.com/watch?v=..." required>
  </label>
  <label>Language
    <select id="language">
      <option value="en" selected>English</option>
      <option value="es">Spanish</option>
      <option value="fr">French</option>
      <option value="de">German</option>
    </select>
  </label>
  <label><input type="checkbox" id="punctuate" checked> Generate punctuated transcript</label>
  <label>Custom filename (optional)
    <input type="text" id="filename" placeholder="Leave blank for default naming">
  </label>
  <button type="submit">Generate Transcript</button>
  <button type="button" id="download" disabled>Download</button>
</form>

<div id="error"></div>
<div id="result"></div>

<script>
const form = document.getElementById('form');
const errorBox = document.getElementById('error');
const resultBox = document.getElementById('result');
const downloadButton = document.getElementById('download');
let lastFilename = null;

function requestBody() {
  return JSON.stringify({
    video_url: document.getElementById('url').value,
    language: document.getElementById('language').value,
    punctuate: document.getElementById('punctuate').checked,
    filename: document.getElementById('filename').value || null,
  });
}

form.addEventListener('submit', async (event) => {
  event.preventDefault();
  errorBox.textContent = '';
  resultBox.style.display = 'none';
  const response = await fetch('/transcript', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: requestBody(),
  });
  const json = await response.json();
  if (!response.ok) {
    errorBox.textContent = json.error || 'Transcript generation failed';
    downloadButton.disabled = true;
    return;
  }
  resultBox.textContent = json.transcript;
  resultBox.style.display = 'block';
  lastFilename = json.filename;
  downloadButton.disabled = false;
});

downloadButton.addEventListener('click', async () => {
  const response = await fetch('/transcript/download', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: requestBody(),
  });
  if (!response.ok) {
    errorBox.textContent = 'Download failed';
    return;
  }
  const blob = await response.blob();
  const link = document.createElement('a');
  link.href = URL.createObjectURL(blob);
  link.download = lastFilename || 'transcript.md';
  link.click();
  URL.revokeObjectURL(link.href);
});
</script>
</body>
</html>
"#;
